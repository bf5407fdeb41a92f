use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::core::normalize::{normalize_state, normalize_token, normalize_tokens, normalize_zip};
use crate::models::{Client, CreateBidRequest, ErrorResponse};
use crate::routes::{postgres_error_response, AppState};
use crate::services::auth::AuthUser;
use crate::services::CacheKey;

/// Configure client and bid routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/bids", web::post().to(create_bid))
        .route("/bids", web::get().to(list_bids))
        .route("/bids/{id}/deactivate", web::post().to(deactivate_bid))
        .route("/clients/{id}", web::get().to(get_client));
}

/// Create a standing bid
///
/// POST /api/v1/bids
///
/// Target arrays are normalized the same way pro coverage is at ingest, so
/// the scoring tiers compare like against like.
async fn create_bid(
    state: web::Data<AppState>,
    _user: AuthUser,
    req: web::Json<CreateBidRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let mut bid_req = req.into_inner();
    bid_req.zips = normalize_tokens(&bid_req.zips, normalize_zip);
    bid_req.neighborhoods = normalize_tokens(&bid_req.neighborhoods, normalize_token);
    bid_req.cities = normalize_tokens(&bid_req.cities, normalize_token);
    bid_req.states = normalize_tokens(&bid_req.states, normalize_state);

    match state.postgres.create_bid(&bid_req).await {
        Ok(bid) => {
            state.cache.delete(&CacheKey::active_bids()).await;
            tracing::info!("Created bid {} for client {}", bid.id, bid.client_id);
            HttpResponse::Ok().json(bid)
        }
        Err(e) => postgres_error_response("Failed to create bid", e),
    }
}

/// List bids, optionally for one client
///
/// GET /api/v1/bids?clientId={uuid}
async fn list_bids(
    state: web::Data<AppState>,
    _user: AuthUser,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let client_id = query.get("clientId").and_then(|v| Uuid::parse_str(v).ok());

    match state.postgres.list_bids(client_id).await {
        Ok(bids) => HttpResponse::Ok().json(bids),
        Err(e) => postgres_error_response("Failed to list bids", e),
    }
}

/// Deactivate a bid
///
/// POST /api/v1/bids/{id}/deactivate
async fn deactivate_bid(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    match state.postgres.deactivate_bid(id).await {
        Ok(true) => {
            state.cache.delete(&CacheKey::active_bids()).await;
            tracing::info!("Deactivated bid {}", id);
            HttpResponse::Ok().json(serde_json::json!({ "deactivated": true }))
        }
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("bid {}", id),
            status_code: 404,
        }),
        Err(e) => postgres_error_response("Failed to deactivate bid", e),
    }
}

/// Fetch a client record, including its credit balance
///
/// GET /api/v1/clients/{id}
async fn get_client(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    let key = CacheKey::client(id);

    if let Ok(client) = state.cache.get::<Client>(&key).await {
        return HttpResponse::Ok().json(client);
    }

    match state.postgres.get_client(id).await {
        Ok(client) => {
            if let Err(e) = state.cache.set(&key, &client).await {
                tracing::warn!("Failed to cache client {}: {}", id, e);
            }
            HttpResponse::Ok().json(client)
        }
        Err(e) => postgres_error_response("Failed to fetch client", e),
    }
}
