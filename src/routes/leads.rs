use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::core::canonicalize_lead;
use crate::models::{
    ErrorResponse, ImportLeadsRequest, ImportLeadsResponse, IngestLeadRequest,
    IngestLeadResponse, PipelineStage, UpdateStageRequest,
};
use crate::routes::{postgres_error_response, AppState};
use crate::services::auth::{verify_webhook_secret, AuthConfig, AuthUser};

/// Configure all lead-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/leads/ingest", web::post().to(ingest_lead))
        .route("/leads/import", web::post().to(import_leads))
        .route("/leads", web::get().to(list_leads))
        .route("/leads/{id}/stage", web::post().to(update_stage));
}

/// Ingest one inbound lead
///
/// POST /api/v1/leads/ingest
///
/// The Zapier-facing webhook. Authenticated with the shared X-Webhook-Secret
/// header rather than a bearer token. The payload is normalized, scored, and
/// upserted by email.
async fn ingest_lead(
    state: web::Data<AppState>,
    auth: web::Data<AuthConfig>,
    req: web::Json<IngestLeadRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if !verify_webhook_secret(&http_req, &auth) {
        return HttpResponse::Unauthorized().json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "missing or invalid webhook secret".to_string(),
            status_code: 401,
        });
    }

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for ingest request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let lead = canonicalize_lead(&req);

    match state.postgres.upsert_pro(&lead).await {
        Ok((pro, created)) => {
            tracing::info!(
                "Ingested lead {} (created: {}, source: {})",
                pro.email,
                created,
                pro.source
            );
            HttpResponse::Ok().json(IngestLeadResponse { pro, created })
        }
        Err(e) => postgres_error_response("Failed to ingest lead", e),
    }
}

/// Import a batch of leads
///
/// POST /api/v1/leads/import
///
/// The CSV-upload path: the dashboard parses the file and posts the rows.
/// Rows that fail validation are counted and skipped, not fatal.
async fn import_leads(
    state: web::Data<AppState>,
    _user: AuthUser,
    req: web::Json<ImportLeadsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let mut imported = 0;
    let mut updated = 0;
    let mut failed = 0;

    for row in &req.leads {
        if row.validate().is_err() {
            failed += 1;
            continue;
        }

        let lead = canonicalize_lead(row);
        match state.postgres.upsert_pro(&lead).await {
            Ok((_, true)) => imported += 1,
            Ok((_, false)) => updated += 1,
            Err(e) => {
                tracing::warn!("Import row failed for {}: {}", lead.email, e);
                failed += 1;
            }
        }
    }

    tracing::info!(
        "Imported batch: {} new, {} updated, {} failed",
        imported,
        updated,
        failed
    );

    HttpResponse::Ok().json(ImportLeadsResponse {
        imported,
        updated,
        failed,
    })
}

/// List pros, optionally filtered by pipeline stage
///
/// GET /api/v1/leads?stage=new_lead
async fn list_leads(
    state: web::Data<AppState>,
    _user: AuthUser,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let stage = match query.get("stage") {
        Some(raw) => match PipelineStage::parse(raw) {
            Some(stage) => Some(stage),
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Invalid stage".to_string(),
                    message: format!("unknown pipeline stage: {}", raw),
                    status_code: 400,
                });
            }
        },
        None => None,
    };

    match state.postgres.list_pros(stage).await {
        Ok(pros) => HttpResponse::Ok().json(pros),
        Err(e) => postgres_error_response("Failed to list leads", e),
    }
}

/// Move a pro between pipeline stages (kanban drag)
///
/// POST /api/v1/leads/{id}/stage
async fn update_stage(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateStageRequest>,
) -> impl Responder {
    let stage = match PipelineStage::parse(&req.stage) {
        Some(stage) => stage,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid stage".to_string(),
                message: format!("unknown pipeline stage: {}", req.stage),
                status_code: 400,
            });
        }
    };

    let id = path.into_inner();
    match state.postgres.update_stage(id, stage).await {
        Ok(pro) => {
            tracing::info!("Moved pro {} to stage {:?}", id, stage);
            HttpResponse::Ok().json(pro)
        }
        Err(e) => postgres_error_response("Failed to update stage", e),
    }
}
