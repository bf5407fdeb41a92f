use crate::core::scoring::match_score;
use crate::models::{
    Bid, BlockReason, Client, MatchDecision, Pro, ScoredBid, ScoringPoints,
};

/// Result of ranking a pro against the active bid book
#[derive(Debug)]
pub struct RankResult {
    pub matches: Vec<ScoredBid>,
    pub total_bids: usize,
}

/// Match orchestrator.
///
/// Holds the configured point values and applies them in two places: ranking
/// a pro against every active bid (the dashboard preview) and the
/// blocked/created decision for a single pro/bid pair.
#[derive(Debug, Clone)]
pub struct Matcher {
    points: ScoringPoints,
}

impl Matcher {
    pub fn new(points: ScoringPoints) -> Self {
        Self { points }
    }

    pub fn with_default_points() -> Self {
        Self {
            points: ScoringPoints::default(),
        }
    }

    pub fn points(&self) -> &ScoringPoints {
        &self.points
    }

    /// Score a pro against every bid, drop inactive bids and sub-floor
    /// scores, rank the rest.
    ///
    /// Sort order: score descending, ties broken by higher bid amount,
    /// remaining ties keep scan order. Results are truncated to `limit`.
    pub fn rank(&self, pro: &Pro, bids: &[(Bid, Client)], limit: usize) -> RankResult {
        let total_bids = bids.len();

        let mut scored: Vec<ScoredBid> = bids
            .iter()
            .filter(|(bid, _)| bid.active)
            .filter_map(|(bid, client)| {
                let breakdown = match_score(pro, bid, client, &self.points);
                let score = breakdown.total();
                if score >= self.points.floor {
                    Some(ScoredBid {
                        bid_id: bid.id,
                        client_id: client.id,
                        client_name: client.name.clone(),
                        amount: bid.amount,
                        score,
                        breakdown,
                    })
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| b.amount.cmp(&a.amount)));
        scored.truncate(limit);

        RankResult {
            matches: scored,
            total_bids,
        }
    }

    /// The blocked/created decision for one pro/bid pair.
    ///
    /// `already_matched` is the caller's pre-insert existence check; there is
    /// no uniqueness constraint behind it. Disqualifiers are checked cheapest
    /// first so the reported reason is stable.
    pub fn decide(
        &self,
        pro: &Pro,
        bid: &Bid,
        client: &Client,
        already_matched: bool,
    ) -> MatchDecision {
        if !bid.active {
            return MatchDecision::Blocked {
                reason: BlockReason::BidInactive,
                score: 0,
            };
        }

        if already_matched {
            return MatchDecision::Blocked {
                reason: BlockReason::AlreadyMatched,
                score: 0,
            };
        }

        let breakdown = match_score(pro, bid, client, &self.points);
        let score = breakdown.total();

        if client.credits < bid.amount {
            return MatchDecision::Blocked {
                reason: BlockReason::InsufficientCredits,
                score,
            };
        }

        if score < self.points.floor {
            return MatchDecision::Blocked {
                reason: BlockReason::BelowFloor,
                score,
            };
        }

        MatchDecision::Create { score, breakdown }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_points()
    }
}
