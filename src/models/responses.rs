use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{BlockReason, Pro, ScoreBreakdown, ScoredBid};

/// Response for the match-preview endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<ScoredBid>,
    #[serde(rename = "totalBids")]
    pub total_bids: usize,
}

/// Response for the ingest endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestLeadResponse {
    pub pro: Pro,
    pub created: bool,
}

/// Response for the batch import endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportLeadsResponse {
    pub imported: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Response for the match-create endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchResponse {
    pub created: bool,
    #[serde(rename = "matchId")]
    pub match_id: Option<Uuid>,
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<BlockReason>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
