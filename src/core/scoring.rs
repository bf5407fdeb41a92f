use crate::core::geography::geographic_match;
use crate::models::{Bid, Client, Pro, ScoreBreakdown, ScoringPoints};

/// Score a pro against a client's bid.
///
/// The score is an additive decomposition over four buckets:
/// - geographic: the first coverage tier that hits (see core::geography)
/// - performance: the bid's minimum thresholds, each worth fixed points
/// - specialization: overlap between pro "wants" and client "provides"
/// - bonus: interest, qualification, and premium-bid extras
///
/// Totals can exceed 100; the floor in `ScoringPoints` decides whether a
/// match would be created at all.
pub fn match_score(pro: &Pro, bid: &Bid, client: &Client, points: &ScoringPoints) -> ScoreBreakdown {
    let (geographic, geo_tier) = geographic_match(pro, bid, points);

    let performance = performance_points(pro, bid, points);

    let (specialization, shared_wants) = specialization_overlap(
        &pro.wants,
        &client.provides,
        points.overlap_per_want,
        points.overlap_cap,
    );

    let bonus = bonus_points(pro, bid, points);

    ScoreBreakdown {
        geographic,
        geo_tier,
        performance,
        specialization,
        shared_wants,
        bonus,
    }
}

/// Points for meeting the bid's minimum thresholds. An unset threshold counts
/// as met; a set-but-unmet threshold contributes nothing and never blocks on
/// its own.
#[inline]
fn performance_points(pro: &Pro, bid: &Bid, points: &ScoringPoints) -> i32 {
    let mut score = 0;

    if bid.min_transactions.map_or(true, |min| pro.transactions >= min) {
        score += points.transactions;
    }
    if bid.min_volume.map_or(true, |min| pro.volume >= min) {
        score += points.volume;
    }
    if bid.min_experience.map_or(true, |min| pro.years_experience >= min) {
        score += points.experience;
    }

    score
}

/// Case-insensitive substring overlap between what the pro wants and what the
/// client provides, in either direction ("leads" matches "buyer leads").
/// Each overlapping want earns `per_want` points, capped at `cap`.
pub fn specialization_overlap(
    wants: &[String],
    provides: &[String],
    per_want: i32,
    cap: i32,
) -> (i32, Vec<String>) {
    let provides_lower: Vec<String> = provides.iter().map(|p| p.to_lowercase()).collect();

    let mut shared = Vec::new();
    for want in wants {
        let want_lower = want.to_lowercase();
        if want_lower.is_empty() {
            continue;
        }
        let hit = provides_lower
            .iter()
            .any(|p| !p.is_empty() && (p.contains(&want_lower) || want_lower.contains(p)));
        if hit {
            shared.push(want.clone());
        }
    }

    let score = (shared.len() as i32 * per_want).min(cap);
    (score, shared)
}

#[inline]
fn bonus_points(pro: &Pro, bid: &Bid, points: &ScoringPoints) -> i32 {
    let mut score = 0;

    if pro.interest_level >= 8 {
        score += points.bonus_interest;
    }
    if pro.qualification_score >= 70 {
        score += points.bonus_qualified;
    }
    if bid.amount >= points.premium_bid_amount {
        score += points.bonus_premium_bid;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoTier, PipelineStage};
    use uuid::Uuid;

    fn test_pro() -> Pro {
        Pro {
            id: Uuid::new_v4(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "5551234567".into(),
            cities: vec!["denver".into()],
            states: vec!["CO".into()],
            zips: vec!["80202".into()],
            counties: vec![],
            neighborhoods: vec![],
            latitude: None,
            longitude: None,
            transactions: 12,
            volume: 4_000_000,
            years_experience: 6,
            interest_level: 9,
            wants: vec!["leads".into(), "mentorship".into()],
            pipeline_stage: PipelineStage::Qualified,
            qualification_score: 80,
            source: "test".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn test_client(provides: &[&str]) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Acme Realty".into(),
            email: "team@acme.example".into(),
            phone: "".into(),
            cities: vec!["denver".into()],
            states: vec!["CO".into()],
            zips: vec![],
            counties: vec![],
            provides: provides.iter().map(|s| s.to_string()).collect(),
            credits: 1000,
            created_at: chrono::Utc::now(),
        }
    }

    fn test_bid(client_id: Uuid) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            client_id,
            active: true,
            amount: 250,
            zips: vec!["80202".into()],
            neighborhoods: vec![],
            cities: vec!["denver".into()],
            states: vec!["CO".into()],
            territory: None,
            min_transactions: Some(10),
            min_volume: None,
            min_experience: Some(5),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_full_breakdown() {
        let pro = test_pro();
        let client = test_client(&["Buyer Leads", "Mentorship Program"]);
        let bid = test_bid(client.id);
        let points = ScoringPoints::default();

        let breakdown = match_score(&pro, &bid, &client, &points);

        assert_eq!(breakdown.geo_tier, GeoTier::Zip);
        assert_eq!(breakdown.geographic, 40);
        // All three thresholds met (volume unset counts as met)
        assert_eq!(breakdown.performance, 30);
        // Both wants overlap
        assert_eq!(breakdown.specialization, 10);
        assert_eq!(breakdown.shared_wants, vec!["leads", "mentorship"]);
        // Interest 9 and qualification 80; bid amount under premium
        assert_eq!(breakdown.bonus, 10);
        assert_eq!(breakdown.total(), 90);
    }

    #[test]
    fn test_unmet_threshold_scores_zero_not_blocking() {
        let mut pro = test_pro();
        pro.transactions = 2;
        let client = test_client(&[]);
        let bid = test_bid(client.id);
        let points = ScoringPoints::default();

        let breakdown = match_score(&pro, &bid, &client, &points);

        // Transactions threshold missed: only volume (unset) and experience
        assert_eq!(breakdown.performance, 15);
        // Still a positive total; thresholds never hard-block
        assert!(breakdown.total() > 0);
    }

    #[test]
    fn test_overlap_case_insensitive_substring() {
        let (score, shared) = specialization_overlap(
            &["LEADS".into()],
            &["buyer leads".into()],
            5,
            20,
        );
        assert_eq!(score, 5);
        assert_eq!(shared, vec!["LEADS"]);
    }

    #[test]
    fn test_overlap_reverse_direction() {
        // Pro wants the longer phrase, client provides the shorter token.
        let (score, shared) = specialization_overlap(
            &["buyer leads".into()],
            &["leads".into()],
            5,
            20,
        );
        assert_eq!(score, 5);
        assert_eq!(shared, vec!["buyer leads"]);
    }

    #[test]
    fn test_overlap_cap() {
        let wants: Vec<String> = (0..8).map(|i| format!("coaching{}", i)).collect();
        let provides = vec!["coaching".into()];
        let (score, shared) = specialization_overlap(&wants, &provides, 5, 20);
        assert_eq!(shared.len(), 8);
        assert_eq!(score, 20);
    }

    #[test]
    fn test_no_overlap() {
        let (score, shared) =
            specialization_overlap(&["mentorship".into()], &["marketing".into()], 5, 20);
        assert_eq!(score, 0);
        assert!(shared.is_empty());
    }

    #[test]
    fn test_empty_tokens_ignored() {
        let (score, _) = specialization_overlap(&["".into()], &["leads".into()], 5, 20);
        assert_eq!(score, 0);
        // An empty provide would substring-match everything; it must not.
        let (score, _) = specialization_overlap(&["leads".into()], &["".into()], 5, 20);
        assert_eq!(score, 0);
    }

    #[test]
    fn test_premium_bid_bonus() {
        let pro = test_pro();
        let client = test_client(&[]);
        let mut bid = test_bid(client.id);
        bid.amount = 500;
        let points = ScoringPoints::default();

        let breakdown = match_score(&pro, &bid, &client, &points);
        assert_eq!(breakdown.bonus, 15);
    }

    #[test]
    fn test_score_can_exceed_100() {
        let mut pro = test_pro();
        pro.transactions = 25;
        pro.qualification_score = 100;
        pro.wants = vec![
            "leads".into(),
            "mentorship".into(),
            "coaching".into(),
            "marketing".into(),
        ];
        let client = test_client(&["leads", "mentorship", "coaching", "marketing"]);
        let mut bid = test_bid(client.id);
        bid.amount = 1000;
        let points = ScoringPoints::default();

        let breakdown = match_score(&pro, &bid, &client, &points);
        // 40 geo + 30 performance + 20 overlap + 15 bonus
        assert_eq!(breakdown.total(), 105);
    }
}
