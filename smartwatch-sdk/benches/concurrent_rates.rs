use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use smartwatch_sdk::{RateKey, RateState, RateTracker};
use std::sync::Arc;
use std::thread;

/// Benchmark one device per thread (no key contention)
fn bench_concurrent_distinct_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_distinct_keys");

    for thread_count in [1, 2, 4, 8].iter() {
        group.throughput(Throughput::Elements(*thread_count as u64 * 1000));
        group.bench_with_input(
            BenchmarkId::new("threads", thread_count),
            thread_count,
            |b, &thread_count| {
                b.iter(|| {
                    let state = Arc::new(RateState::new());
                    let mut handles = vec![];

                    for t in 0..thread_count {
                        let state = Arc::clone(&state);
                        handles.push(thread::spawn(move || {
                            let key = RateKey::cmd_timeout(format!("/dev/sd{t}")).to_string();
                            for i in 0..1000i64 {
                                let _ = black_box(state.get_rate(&key, i as f64, i));
                            }
                        }));
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }
    group.finish();
}

/// Benchmark all threads hitting one key (high contention)
fn bench_concurrent_same_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_same_key");

    for thread_count in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements(*thread_count as u64 * 1000));
        group.bench_with_input(
            BenchmarkId::from_parameter(thread_count),
            thread_count,
            |b, &thread_count| {
                b.iter(|| {
                    let state = Arc::new(RateState::new());
                    let mut handles = vec![];

                    for _ in 0..thread_count {
                        let state = Arc::clone(&state);
                        handles.push(thread::spawn(move || {
                            for i in 0..1000i64 {
                                let _ = black_box(state.get_rate("shared", i as f64, i));
                            }
                        }));
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_concurrent_distinct_keys,
    bench_concurrent_same_key
);
criterion_main!(benches);
