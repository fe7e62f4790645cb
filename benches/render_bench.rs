//! Benchmarks for history chart preparation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;
use weatherdash::model::RawReading;
use weatherdash::render::{chart_points, render_frame_with, sparkline, FrameStyle};
use weatherdash::{HourRange, ViewState};

/// One reading per minute, with every 50th timestamp broken
fn create_history(count: usize) -> Vec<RawReading> {
    (0..count)
        .map(|i| {
            let ts = if i % 50 == 49 {
                "not-a-date".to_string()
            } else {
                format!("2024-01-{:02}T{:02}:{:02}:00Z", 1 + i / 1440, (i / 60) % 24, i % 60)
            };
            RawReading::new(json!({
                "ts": ts,
                "temp_f": 60.0 + (i as f64 / 30.0).sin() * 8.0,
                "humidity": 45.0 + (i % 20) as f64,
                "pressure": 1013.0 + (i as f64 / 90.0).cos(),
                "temp_from_humidity": 16.5,
                "temp_from_pressure": 17.25
            }))
        })
        .collect()
}

fn bench_chart_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_points");

    // 1 hour, 24 hours and 7 days at one sample per minute
    for size in [60, 1440, 10080] {
        let history = create_history(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("points_{}", size), |b| {
            b.iter(|| chart_points(black_box(&history)))
        });
    }

    group.finish();
}

fn bench_sparkline(c: &mut Criterion) {
    let values: Vec<f64> = (0..10080).map(|i| (i as f64 / 100.0).sin()).collect();

    c.bench_function("sparkline_10080_to_60", |b| {
        b.iter(|| sparkline(black_box(&values), 60))
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut state = ViewState::with_range(HourRange::OneWeek);
    state.current_loading = false;
    state.history_loading = false;
    state.history = create_history(10080);

    let style = FrameStyle {
        ansi: false,
        chart_width: 60,
    };

    c.bench_function("render_frame_week", |b| {
        b.iter(|| render_frame_with(black_box(&state), "http://localhost:8000", style))
    });
}

criterion_group!(benches, bench_chart_points, bench_sparkline, bench_frame);
criterion_main!(benches);
