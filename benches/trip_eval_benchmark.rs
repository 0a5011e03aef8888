use criterion::{black_box, criterion_group, criterion_main, Criterion};
use greenmiles::models::trip::evaluate_trip;

/// Build a plausible walking route: one sample every 5 seconds,
/// roughly 1.4 m/s northbound.
fn walking_route(samples: usize) -> String {
    let parts: Vec<String> = (0..samples)
        .map(|i| {
            let lat = 37.0 + (i as f64) * 0.000063;
            let t = (i as i64) * 5;
            format!(r#"{{"lat":{:.6},"lng":-122.0,"t":{}}}"#, lat, t)
        })
        .collect();
    format!("[{}]", parts.join(","))
}

fn benchmark_trip_evaluation(c: &mut Criterion) {
    let short_route = walking_route(120);
    let long_route = walking_route(1200);

    let mut group = c.benchmark_group("trip_evaluation");

    group.bench_function("no_route_payload", |b| {
        b.iter(|| evaluate_trip(black_box(1500.0), black_box(1200), black_box("")))
    });

    group.bench_function("ten_minute_route", |b| {
        b.iter(|| evaluate_trip(black_box(1500.0), black_box(1200), black_box(&short_route)))
    });

    group.bench_function("hundred_minute_route", |b| {
        b.iter(|| evaluate_trip(black_box(8000.0), black_box(6000), black_box(&long_route)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_trip_evaluation);
criterion_main!(benches);
