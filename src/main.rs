mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Settings;
use crate::core::Matcher;
use crate::routes::AppState;
use crate::services::{AuthConfig, CacheManager, Notifier, PostgresClient};

/// JSON body returned for malformed payloads, matching the envelope the
/// handlers use everywhere else.
#[derive(Debug, serde::Serialize)]
pub struct PayloadError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl error::ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(self)
    }
}

fn json_error_handler(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected JSON payload on {}: {}", req.path(), err);
    PayloadError {
        error: "invalid_json".to_string(),
        message: err.to_string(),
        status_code: 400,
    }
    .into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    PayloadError {
        error: "invalid_query".to_string(),
        message: err.to_string(),
        status_code: 400,
    }
    .into()
}

/// Tracing setup from the [logging] config section; LOG_LEVEL and LOG_FORMAT
/// env vars still win for quick overrides.
fn init_tracing(settings: &Settings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level))
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        builder.pretty().init();
    } else {
        builder.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Config first so the logger can be driven by it
    let settings = Settings::load()
        .unwrap_or_else(|e| panic!("Configuration error: {}", e));

    init_tracing(&settings);

    info!("Starting OwlDoor match service...");

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            Some(db_min_conn),
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let cache_capacity = settings.cache.capacity.unwrap_or(1000);
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let cache = Arc::new(CacheManager::new(cache_capacity, cache_ttl));

    info!("Cache initialized ({} entries, TTL: {}s)", cache_capacity, cache_ttl);

    let notifier = Arc::new(Notifier::new(
        settings.twilio.clone(),
        settings.zapier.clone(),
    ));

    info!(
        "Notifier initialized (twilio: {}, zapier: {})",
        settings.twilio.enabled, settings.zapier.enabled
    );

    let points = settings.scoring.to_points();
    let matcher = Matcher::new(points);

    info!("Matcher initialized (floor: {})", points.floor);

    let auth_config = AuthConfig {
        jwt_secret: settings.auth.jwt_secret.clone(),
        webhook_secret: settings.auth.webhook_secret.clone(),
    };

    let app_state = AppState {
        postgres,
        cache,
        notifier,
        matcher,
        max_limit: settings.matching.max_limit.unwrap_or(100),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
