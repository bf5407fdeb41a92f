// Route exports
pub mod clients;
pub mod leads;
pub mod matches;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{CacheManager, Notifier, PostgresClient, PostgresError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub notifier: Arc<Notifier>,
    pub matcher: Matcher,
    pub max_limit: u16,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(leads::configure)
            .configure(matches::configure)
            .configure(clients::configure),
    );
}

/// Map a service error to the uniform error envelope.
/// Missing rows are 404; everything else logs and returns 500.
pub(crate) fn postgres_error_response(context: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(what) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: what,
            status_code: 404,
        }),
        PostgresError::InvalidInput(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_input".to_string(),
            message,
            status_code: 400,
        }),
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}
