// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Bid, BlockReason, Client, GeoTier, GeoVertex, Match, MatchDecision, MatchStatus,
    PipelineStage, Pro, ScoreBreakdown, ScoredBid, ScoringPoints,
};
pub use requests::{
    CreateBidRequest, CreateMatchRequest, FindMatchesRequest, ImportLeadsRequest,
    IngestLeadRequest, UpdateStageRequest,
};
pub use responses::{
    CreateMatchResponse, ErrorResponse, FindMatchesResponse, HealthResponse,
    ImportLeadsResponse, IngestLeadResponse,
};
