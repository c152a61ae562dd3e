use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::FeatureEngine;
use market_frame::{schema, Column, Frame};

/// A month of 5-minute observations at one node.
fn month_frame() -> Frame {
    let n = 12 * 24 * 30;
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut frame = Frame::new();
    frame
        .set_column(
            schema::TIMESTAMP,
            Column::Timestamp(
                (0..n)
                    .map(|i| Some(start + Duration::minutes(5 * i as i64)))
                    .collect(),
            ),
        )
        .unwrap();
    frame
        .set_column(
            schema::TOTAL_LMP,
            Column::Float(
                (0..n)
                    .map(|i| Some(30.0 + (i % 15) as f64 + ((i / 288) % 7) as f64))
                    .collect(),
            ),
        )
        .unwrap();
    frame
        .set_column(
            schema::SOURCE,
            Column::Text(vec![Some("rt_lmp".to_string()); n]),
        )
        .unwrap();
    frame
}

fn bench_build_features(c: &mut Criterion) {
    let engine = FeatureEngine::default();
    let frame = month_frame();
    c.bench_function("build_features_month", |b| {
        b.iter(|| engine.build_features(black_box(&frame)).unwrap())
    });
}

criterion_group!(benches, bench_build_features);
criterion_main!(benches);
