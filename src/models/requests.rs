use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::GeoVertex;

/// Inbound lead payload, as posted by Zapier, a web form, or a CSV import row.
/// Everything beyond the email is optional; normalization fills the gaps.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngestLeadRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(alias = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(alias = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub zips: Vec<String>,
    #[serde(default)]
    pub counties: Vec<String>,
    #[serde(default)]
    pub neighborhoods: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub transactions: Option<i32>,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(alias = "yearsExperience", default)]
    pub years_experience: Option<i32>,
    #[serde(alias = "interestLevel", default)]
    pub interest_level: Option<i32>,
    #[serde(default)]
    pub wants: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Batch import: the CSV-upload path posts parsed rows as an array.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportLeadsRequest {
    #[validate(length(min = 1, max = 1000))]
    pub leads: Vec<IngestLeadRequest>,
}

/// Request to rank a pro against all active bids (read-only preview)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(alias = "pro_id", rename = "proId")]
    pub pro_id: Uuid,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

/// Request to run the blocked/created decision for a pro/bid pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMatchRequest {
    #[serde(alias = "pro_id", rename = "proId")]
    pub pro_id: Uuid,
    #[serde(alias = "bid_id", rename = "bidId")]
    pub bid_id: Uuid,
}

/// Request to move a pro between pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStageRequest {
    #[validate(length(min = 1))]
    pub stage: String,
}

/// Request to create a standing bid for a client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBidRequest {
    #[serde(alias = "client_id", rename = "clientId")]
    pub client_id: Uuid,
    #[validate(range(min = 0))]
    pub amount: i64,
    #[serde(default)]
    pub zips: Vec<String>,
    #[serde(default)]
    pub neighborhoods: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub territory: Option<Vec<GeoVertex>>,
    #[serde(alias = "minTransactions", default)]
    pub min_transactions: Option<i32>,
    #[serde(alias = "minVolume", default)]
    pub min_volume: Option<i64>,
    #[serde(alias = "minExperience", default)]
    pub min_experience: Option<i32>,
}
