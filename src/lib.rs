//! OwlDoor Match - lead matching service for the OwlDoor recruiting platform
//!
//! This library provides the scoring and matching pipeline that pairs real
//! estate and mortgage professionals with the brokerages and lenders bidding
//! for them: lead normalization, qualification scoring, tiered geographic
//! matching, and the blocked/created match decision.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{canonicalize_lead, match_score, qualification_score, Matcher};
pub use crate::models::{
    Bid, BlockReason, Client, MatchDecision, PipelineStage, Pro, ScoreBreakdown, ScoredBid,
    ScoringPoints,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let score = qualification_score(20, 10, 8);
        assert_eq!(score, 100);
    }
}
