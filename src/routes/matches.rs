use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    Bid, Client, CreateMatchRequest, CreateMatchResponse, ErrorResponse, FindMatchesRequest,
    FindMatchesResponse, HealthResponse, MatchDecision,
};
use crate::routes::{postgres_error_response, AppState};
use crate::services::auth::AuthUser;
use crate::services::{CacheKey, PostgresError};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/create", web::post().to(create_match))
        .route("/matches", web::get().to(list_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// The active bid book, from cache when fresh.
async fn load_bid_book(state: &AppState) -> Result<Vec<(Bid, Client)>, PostgresError> {
    let key = CacheKey::active_bids();

    if let Ok(bids) = state.cache.get::<Vec<(Bid, Client)>>(&key).await {
        return Ok(bids);
    }

    let bids = state.postgres.active_bids_with_clients().await?;
    if let Err(e) = state.cache.set(&key, &bids).await {
        tracing::warn!("Failed to cache bid book: {}", e);
    }
    Ok(bids)
}

/// Rank a pro against the active bid book (read-only preview)
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "proId": "uuid",
///   "limit": 20
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    _user: AuthUser,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let limit = req.limit.min(state.max_limit).max(1) as usize;

    tracing::info!("Finding matches for pro: {}, limit: {}", req.pro_id, limit);

    let pro = match state.postgres.get_pro(req.pro_id).await {
        Ok(pro) => pro,
        Err(e) => return postgres_error_response("Failed to fetch pro", e),
    };

    let bid_book = match load_bid_book(&state).await {
        Ok(bids) => bids,
        Err(e) => return postgres_error_response("Failed to load bids", e),
    };

    tracing::debug!("Scoring pro {} against {} bids", pro.id, bid_book.len());

    let result = state.matcher.rank(&pro, &bid_book, limit);

    tracing::info!(
        "Returning {} matches for pro {} (from {} bids)",
        result.matches.len(),
        pro.id,
        result.total_bids
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        total_bids: result.total_bids,
    })
}

/// Run the blocked/created decision for a pro/bid pair
///
/// POST /api/v1/matches/create
///
/// A blocked outcome is a normal business result and returns 200 with the
/// reason; only infrastructure failures are errors.
async fn create_match(
    state: web::Data<AppState>,
    _user: AuthUser,
    req: web::Json<CreateMatchRequest>,
) -> impl Responder {
    let pro = match state.postgres.get_pro(req.pro_id).await {
        Ok(pro) => pro,
        Err(e) => return postgres_error_response("Failed to fetch pro", e),
    };

    let bid = match state.postgres.get_bid(req.bid_id).await {
        Ok(bid) => bid,
        Err(e) => return postgres_error_response("Failed to fetch bid", e),
    };

    let client = match state.postgres.get_client(bid.client_id).await {
        Ok(client) => client,
        Err(e) => return postgres_error_response("Failed to fetch client", e),
    };

    // The single pre-insert existence check; no constraint backs it up.
    let already_matched = match state.postgres.match_exists(pro.id, bid.id).await {
        Ok(exists) => exists,
        Err(e) => return postgres_error_response("Failed to check existing match", e),
    };

    match state.matcher.decide(&pro, &bid, &client, already_matched) {
        MatchDecision::Create { score, breakdown } => {
            let record = match state
                .postgres
                .create_match(pro.id, bid.id, client.id, score, &breakdown, bid.amount)
                .await
            {
                Ok(record) => record,
                Err(e) => return postgres_error_response("Failed to create match", e),
            };

            // Credits and pro stage changed; cached copies are stale.
            state.cache.delete(&CacheKey::active_bids()).await;
            state.cache.delete(&CacheKey::client(client.id)).await;

            state.notifier.match_created(&pro, &client.name, &record).await;

            HttpResponse::Ok().json(CreateMatchResponse {
                created: true,
                match_id: Some(record.id),
                score,
                breakdown: Some(breakdown),
                blocked: None,
            })
        }
        MatchDecision::Blocked { reason, score } => {
            tracing::info!(
                "Match blocked for pro {} / bid {}: {:?} (score {})",
                pro.id,
                bid.id,
                reason,
                score
            );
            HttpResponse::Ok().json(CreateMatchResponse {
                created: false,
                match_id: None,
                score,
                breakdown: None,
                blocked: Some(reason),
            })
        }
    }
}

/// List matches for a pro or a client
///
/// GET /api/v1/matches?proId={uuid} or ?clientId={uuid}
async fn list_matches(
    state: web::Data<AppState>,
    _user: AuthUser,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let pro_id = query.get("proId").and_then(|v| Uuid::parse_str(v).ok());
    let client_id = query.get("clientId").and_then(|v| Uuid::parse_str(v).ok());

    if pro_id.is_none() && client_id.is_none() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Missing parameter".to_string(),
            message: "proId or clientId query parameter is required".to_string(),
            status_code: 400,
        });
    }

    match state.postgres.list_matches(pro_id, client_id).await {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => postgres_error_response("Failed to list matches", e),
    }
}
