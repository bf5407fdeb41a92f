// Integration tests for the OwlDoor match service

use owldoor_match::config::{TwilioSettings, ZapierSettings};
use owldoor_match::core::{canonicalize_lead, Matcher};
use owldoor_match::models::requests::IngestLeadRequest;
use owldoor_match::models::{
    Bid, BlockReason, Client, Match, MatchDecision, MatchStatus, PipelineStage, Pro,
};
use owldoor_match::services::Notifier;
use uuid::Uuid;

fn make_pro(zips: &[&str], states: &[&str], wants: &[&str]) -> Pro {
    Pro {
        id: Uuid::new_v4(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "5551234567".to_string(),
        cities: vec!["denver".to_string()],
        states: states.iter().map(|s| s.to_string()).collect(),
        zips: zips.iter().map(|s| s.to_string()).collect(),
        counties: vec![],
        neighborhoods: vec![],
        latitude: None,
        longitude: None,
        transactions: 15,
        volume: 5_000_000,
        years_experience: 8,
        interest_level: 9,
        wants: wants.iter().map(|s| s.to_string()).collect(),
        pipeline_stage: PipelineStage::Qualified,
        qualification_score: 90,
        source: "zapier".to_string(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

fn make_client(name: &str, credits: i64, provides: &[&str]) -> Client {
    Client {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', "-")),
        phone: String::new(),
        cities: vec![],
        states: vec![],
        zips: vec![],
        counties: vec![],
        provides: provides.iter().map(|s| s.to_string()).collect(),
        credits,
        created_at: chrono::Utc::now(),
    }
}

fn make_bid(client: &Client, amount: i64, zips: &[&str], states: &[&str]) -> Bid {
    Bid {
        id: Uuid::new_v4(),
        client_id: client.id,
        active: true,
        amount,
        zips: zips.iter().map(|s| s.to_string()).collect(),
        neighborhoods: vec![],
        cities: vec![],
        states: states.iter().map(|s| s.to_string()).collect(),
        territory: None,
        min_transactions: None,
        min_volume: None,
        min_experience: None,
        created_at: chrono::Utc::now(),
    }
}

#[test]
fn test_end_to_end_ranking() {
    let matcher = Matcher::with_default_points();
    let pro = make_pro(&["80202"], &["CO"], &["leads"]);

    let zip_client = make_client("Zip Brokerage", 1000, &["buyer leads"]);
    let state_client = make_client("State Brokerage", 1000, &[]);
    let far_client = make_client("Far Brokerage", 1000, &[]);

    let bids = vec![
        (make_bid(&state_client, 100, &[], &["CO"]), state_client.clone()),
        (make_bid(&zip_client, 100, &["80202"], &[]), zip_client.clone()),
        (make_bid(&far_client, 100, &["10001"], &["NY"]), far_client.clone()),
    ];

    let result = matcher.rank(&pro, &bids, 10);

    assert_eq!(result.total_bids, 3);
    // The NY bid has no geography and scores below every CO bid
    assert!(result.matches.len() >= 2);
    // Zip precision outranks state overlap
    assert_eq!(result.matches[0].client_name, "Zip Brokerage");
    assert!(result.matches[0].score > result.matches[1].score);

    // Scores are sorted descending throughout
    for pair in result.matches.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_end_to_end_decision_pipeline() {
    let matcher = Matcher::with_default_points();
    let pro = make_pro(&["80202"], &["CO"], &["leads"]);

    let client = make_client("Acme Realty", 500, &["buyer leads"]);
    let bid = make_bid(&client, 200, &["80202"], &[]);

    // First pass creates
    let decision = matcher.decide(&pro, &bid, &client, false);
    let (score, breakdown) = match decision {
        MatchDecision::Create { score, breakdown } => (score, breakdown),
        MatchDecision::Blocked { reason, .. } => panic!("unexpected block: {:?}", reason),
    };
    assert!(score >= 20);
    assert_eq!(breakdown.total(), score);

    // Second pass sees the existing match and blocks
    match matcher.decide(&pro, &bid, &client, true) {
        MatchDecision::Blocked { reason, .. } => assert_eq!(reason, BlockReason::AlreadyMatched),
        _ => panic!("expected already-matched block"),
    }

    // Broke client blocks on credits
    let broke = make_client("Broke Realty", 100, &[]);
    let rich_bid = make_bid(&broke, 500, &["80202"], &[]);
    match matcher.decide(&pro, &rich_bid, &broke, false) {
        MatchDecision::Blocked { reason, .. } => {
            assert_eq!(reason, BlockReason::InsufficientCredits)
        }
        _ => panic!("expected credit block"),
    }
}

#[test]
fn test_ingest_to_rank_round_trip() {
    // A raw Zapier payload, normalized and scored, then ranked
    let req = IngestLeadRequest {
        email: " Jane@Example.COM ".to_string(),
        name: Some("Jane   Doe".to_string()),
        first_name: None,
        last_name: None,
        phone: Some("+1 (555) 123-4567".to_string()),
        cities: vec!["Denver".to_string()],
        states: vec![" co".to_string()],
        zips: vec!["80202-1234".to_string()],
        counties: vec![],
        neighborhoods: vec![],
        latitude: None,
        longitude: None,
        transactions: Some(20),
        volume: Some(8_000_000),
        years_experience: Some(10),
        interest_level: Some(8),
        wants: vec!["Leads".to_string()],
        source: Some("zapier".to_string()),
    };

    let lead = canonicalize_lead(&req);
    assert_eq!(lead.email, "jane@example.com");
    assert_eq!(lead.zips, vec!["80202"]);
    assert_eq!(lead.states, vec!["CO"]);
    assert_eq!(lead.qualification_score, 100);

    let pro = Pro {
        id: Uuid::new_v4(),
        first_name: lead.first_name,
        last_name: lead.last_name,
        email: lead.email,
        phone: lead.phone,
        cities: lead.cities,
        states: lead.states,
        zips: lead.zips,
        counties: lead.counties,
        neighborhoods: lead.neighborhoods,
        latitude: lead.latitude,
        longitude: lead.longitude,
        transactions: lead.transactions,
        volume: lead.volume,
        years_experience: lead.years_experience,
        interest_level: lead.interest_level,
        wants: lead.wants,
        pipeline_stage: PipelineStage::NewLead,
        qualification_score: lead.qualification_score,
        source: lead.source,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let matcher = Matcher::with_default_points();
    let client = make_client("Acme Realty", 1000, &["buyer leads"]);
    let bid = make_bid(&client, 100, &["80202"], &[]);

    let result = matcher.rank(&pro, &[(bid, client)], 10);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].breakdown.shared_wants, vec!["leads"]);
}

fn make_match(pro: &Pro, bid: &Bid) -> Match {
    Match {
        id: Uuid::new_v4(),
        pro_id: pro.id,
        bid_id: bid.id,
        client_id: bid.client_id,
        status: MatchStatus::Pending,
        score: 75,
        breakdown: None,
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn test_twilio_sms_request_shape() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/2010-04-01/Accounts/AC123/Messages.json")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("To".into(), "+15551234567".into()),
            mockito::Matcher::UrlEncoded("From".into(), "+15550001111".into()),
        ]))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let twilio = TwilioSettings {
        enabled: true,
        account_sid: "AC123".to_string(),
        auth_token: "token".to_string(),
        from_number: "+15550001111".to_string(),
    };
    let notifier =
        Notifier::new(twilio, ZapierSettings::default()).with_twilio_base_url(server.url());

    notifier.send_sms("+15551234567", "hello").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_zapier_hook_request_shape() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/hooks/catch/12345")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body("{\"status\":\"success\"}")
        .create_async()
        .await;

    let zapier = ZapierSettings {
        enabled: true,
        hook_url: format!("{}/hooks/catch/12345", server.url()),
    };
    let notifier = Notifier::new(TwilioSettings::default(), zapier);

    notifier
        .post_hook(&serde_json::json!({"event": "match.created"}))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_notification_failure_is_tolerated() {
    let mut server = mockito::Server::new_async().await;

    // Both channels fail; match_created must still return cleanly.
    let _mock = server
        .mock("POST", mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let twilio = TwilioSettings {
        enabled: true,
        account_sid: "AC123".to_string(),
        auth_token: "token".to_string(),
        from_number: "+15550001111".to_string(),
    };
    let zapier = ZapierSettings {
        enabled: true,
        hook_url: format!("{}/hooks/catch/12345", server.url()),
    };
    let notifier = Notifier::new(twilio, zapier).with_twilio_base_url(server.url());

    let pro = make_pro(&["80202"], &["CO"], &[]);
    let client = make_client("Acme Realty", 1000, &[]);
    let bid = make_bid(&client, 100, &["80202"], &[]);
    let record = make_match(&pro, &bid);

    notifier.match_created(&pro, &client.name, &record).await;
}
