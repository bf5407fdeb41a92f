// Criterion benchmarks for the OwlDoor match service

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use owldoor_match::core::{match_score, qualification_score, specialization_overlap, Matcher};
use owldoor_match::models::{Bid, Client, PipelineStage, Pro, ScoringPoints};
use uuid::Uuid;

fn create_pro() -> Pro {
    Pro {
        id: Uuid::new_v4(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "5551234567".to_string(),
        cities: vec!["denver".to_string(), "boulder".to_string()],
        states: vec!["CO".to_string()],
        zips: vec!["80202".to_string(), "80301".to_string()],
        counties: vec![],
        neighborhoods: vec!["lodo".to_string()],
        latitude: Some(39.7392),
        longitude: Some(-104.9903),
        transactions: 15,
        volume: 5_000_000,
        years_experience: 8,
        interest_level: 9,
        wants: vec!["leads".to_string(), "mentorship".to_string(), "marketing".to_string()],
        pipeline_stage: PipelineStage::Qualified,
        qualification_score: 90,
        source: "zapier".to_string(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

fn create_client(i: usize) -> Client {
    Client {
        id: Uuid::new_v4(),
        name: format!("Brokerage {}", i),
        email: format!("team{}@example.com", i),
        phone: String::new(),
        cities: vec!["denver".to_string()],
        states: vec!["CO".to_string()],
        zips: vec![],
        counties: vec![],
        provides: vec!["buyer leads".to_string(), "coaching".to_string()],
        credits: 1000,
        created_at: chrono::Utc::now(),
    }
}

fn create_bid(client: &Client, i: usize) -> Bid {
    // Every fifth bid targets the pro's zip, the rest spread across tiers
    let (zips, cities, states) = match i % 5 {
        0 => (vec!["80202".to_string()], vec![], vec![]),
        1 => (vec![], vec!["denver".to_string()], vec!["CO".to_string()]),
        2 => (vec![], vec![], vec!["CO".to_string()]),
        3 => (vec!["10001".to_string()], vec![], vec!["NY".to_string()]),
        _ => (vec![], vec!["boulder".to_string()], vec![]),
    };

    Bid {
        id: Uuid::new_v4(),
        client_id: client.id,
        active: true,
        amount: 100 + (i as i64 % 400),
        zips,
        neighborhoods: vec![],
        cities,
        states,
        territory: None,
        min_transactions: Some(10),
        min_volume: None,
        min_experience: Some(5),
        created_at: chrono::Utc::now(),
    }
}

fn bench_qualification_score(c: &mut Criterion) {
    c.bench_function("qualification_score", |b| {
        b.iter(|| {
            qualification_score(black_box(15), black_box(8), black_box(9))
        });
    });
}

fn bench_match_score(c: &mut Criterion) {
    let pro = create_pro();
    let client = create_client(0);
    let bid = create_bid(&client, 0);
    let points = ScoringPoints::default();

    c.bench_function("match_score", |b| {
        b.iter(|| {
            match_score(
                black_box(&pro),
                black_box(&bid),
                black_box(&client),
                black_box(&points),
            )
        });
    });
}

fn bench_specialization_overlap(c: &mut Criterion) {
    let wants: Vec<String> = (0..10).map(|i| format!("specialty {}", i)).collect();
    let provides: Vec<String> = (0..10).map(|i| format!("specialty {} program", i)).collect();

    c.bench_function("specialization_overlap_10x10", |b| {
        b.iter(|| {
            specialization_overlap(black_box(&wants), black_box(&provides), 5, 20)
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_points();
    let pro = create_pro();

    let mut group = c.benchmark_group("ranking");

    for bid_count in [10, 50, 100, 500, 1000].iter() {
        let bids: Vec<(Bid, Client)> = (0..*bid_count)
            .map(|i| {
                let client = create_client(i);
                let bid = create_bid(&client, i);
                (bid, client)
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("rank", bid_count),
            bid_count,
            |b, _| {
                b.iter(|| {
                    matcher.rank(black_box(&pro), black_box(&bids), black_box(20))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_qualification_score,
    bench_match_score,
    bench_specialization_overlap,
    bench_ranking
);
criterion_main!(benches);
