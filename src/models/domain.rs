use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Recruiting pipeline stage for a pro, as shown on the dashboard kanban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pipeline_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    NewLead,
    Contacted,
    Qualified,
    Matched,
    Placed,
    Lost,
}

impl PipelineStage {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new_lead" => Some(Self::NewLead),
            "contacted" => Some(Self::Contacted),
            "qualified" => Some(Self::Qualified),
            "matched" => Some(Self::Matched),
            "placed" => Some(Self::Placed),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

/// Status of a realized pro/client pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Declined,
}

/// A single vertex of a drawn territory, in map order (lng, lat).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoVertex {
    pub lng: f64,
    pub lat: f64,
}

/// Agent or loan officer profile record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pro {
    pub id: Uuid,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub zips: Vec<String>,
    pub counties: Vec<String>,
    pub neighborhoods: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub transactions: i32,
    pub volume: i64,
    #[serde(rename = "yearsExperience")]
    pub years_experience: i32,
    #[serde(rename = "interestLevel")]
    pub interest_level: i32,
    pub wants: Vec<String>,
    #[serde(rename = "pipelineStage")]
    pub pipeline_stage: PipelineStage,
    #[serde(rename = "qualificationScore")]
    pub qualification_score: i32,
    pub source: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Pro {
    /// Coordinates as (lng, lat), when the record carries both.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }
}

/// Brokerage, team, or lender account that purchases leads
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub zips: Vec<String>,
    pub counties: Vec<String>,
    pub provides: Vec<String>,
    pub credits: i64,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A client's standing offer: target geography, minimum thresholds, bid amount
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: Uuid,
    #[serde(rename = "clientId")]
    pub client_id: Uuid,
    pub active: bool,
    pub amount: i64,
    pub zips: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    #[serde(default)]
    pub territory: Option<Json<Vec<GeoVertex>>>,
    #[serde(rename = "minTransactions", default)]
    pub min_transactions: Option<i32>,
    #[serde(rename = "minVolume", default)]
    pub min_volume: Option<i64>,
    #[serde(rename = "minExperience", default)]
    pub min_experience: Option<i32>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Bid {
    /// Territory ring as plain vertices, when one was drawn.
    pub fn territory_ring(&self) -> Option<&[GeoVertex]> {
        self.territory.as_ref().map(|t| t.0.as_slice())
    }
}

/// Realized pairing of a pro to a client's bid
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: Uuid,
    #[serde(rename = "proId")]
    pub pro_id: Uuid,
    #[serde(rename = "bidId")]
    pub bid_id: Uuid,
    #[serde(rename = "clientId")]
    pub client_id: Uuid,
    pub status: MatchStatus,
    pub score: i32,
    #[serde(default)]
    pub breakdown: Option<Json<ScoreBreakdown>>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Geographic tier that matched, most precise first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoTier {
    Zip,
    Territory,
    Neighborhood,
    CityState,
    City,
    State,
    None,
}

/// Additive decomposition of a match score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub geographic: i32,
    #[serde(rename = "geoTier")]
    pub geo_tier: GeoTier,
    pub performance: i32,
    pub specialization: i32,
    #[serde(rename = "sharedWants")]
    pub shared_wants: Vec<String>,
    pub bonus: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.geographic + self.performance + self.specialization + self.bonus
    }
}

/// A bid scored against a pro, ready for ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredBid {
    #[serde(rename = "bidId")]
    pub bid_id: Uuid,
    #[serde(rename = "clientId")]
    pub client_id: Uuid,
    #[serde(rename = "clientName")]
    pub client_name: String,
    pub amount: i64,
    pub score: i32,
    pub breakdown: ScoreBreakdown,
}

/// Why a match was not created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    BidInactive,
    AlreadyMatched,
    InsufficientCredits,
    BelowFloor,
}

/// Outcome of the blocked/created decision for a pro/bid pair
#[derive(Debug, Clone)]
pub enum MatchDecision {
    Create { score: i32, breakdown: ScoreBreakdown },
    Blocked { reason: BlockReason, score: i32 },
}

impl MatchDecision {
    pub fn is_create(&self) -> bool {
        matches!(self, MatchDecision::Create { .. })
    }
}

/// Point values for every scoring bucket
#[derive(Debug, Clone, Copy)]
pub struct ScoringPoints {
    pub zip: i32,
    pub territory: i32,
    pub neighborhood: i32,
    pub city_state: i32,
    pub city: i32,
    pub state: i32,
    pub transactions: i32,
    pub volume: i32,
    pub experience: i32,
    pub overlap_per_want: i32,
    pub overlap_cap: i32,
    pub bonus_interest: i32,
    pub bonus_qualified: i32,
    pub bonus_premium_bid: i32,
    pub premium_bid_amount: i64,
    pub floor: i32,
}

impl Default for ScoringPoints {
    fn default() -> Self {
        Self {
            zip: 40,
            territory: 40,
            neighborhood: 35,
            city_state: 30,
            city: 25,
            state: 15,
            transactions: 15,
            volume: 10,
            experience: 5,
            overlap_per_want: 5,
            overlap_cap: 20,
            bonus_interest: 5,
            bonus_qualified: 5,
            bonus_premium_bid: 5,
            premium_bid_amount: 500,
            floor: 20,
        }
    }
}
