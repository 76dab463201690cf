use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use date_window::{resolve, OutputMode, RawArgument, ResolverConfig};
use std::hint::black_box;

fn bench_resolve(c: &mut Criterion) {
    let now = NaiveDate::from_ymd_opt(2022, 3, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let timestamps = ResolverConfig::default();
    let expressions = ResolverConfig {
        mode: OutputMode::Expressions,
        ..Default::default()
    };

    let cases = [
        ("absent", RawArgument::Absent),
        ("two_dates", RawArgument::from("2022/01/01:2022/01/05")),
        ("date_and_count", RawArgument::from("Jan 5 2022:7")),
        ("date_math", RawArgument::from("2022-01-05T10:30:2w")),
    ];

    let mut group = c.benchmark_group("resolve");
    for (name, raw) in &cases {
        group.bench_function(format!("timestamps/{name}"), |b| {
            b.iter(|| resolve(black_box(raw), &timestamps, now))
        });
        group.bench_function(format!("expressions/{name}"), |b| {
            b.iter(|| resolve(black_box(raw), &expressions, now))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
