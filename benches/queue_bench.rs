//! Benchmarks for the worker pool admission path.
//!
//! Benchmarks cover:
//! - Enqueue into a queue with spare capacity
//! - Rejection cost when the queue is full
//! - End-to-end submit + drain through the task service

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use task_worker_pool::core::{TaskService, WorkerPool};
use task_worker_pool::infra::InMemoryTaskStore;

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");

    for capacity in [64usize, 1024, 16_384] {
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let pool = WorkerPool::new(capacity, Arc::new(InMemoryTaskStore::new()));
                    for id in 1..=capacity {
                        let _ = black_box(pool.enqueue(id as i64));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_rejection(c: &mut Criterion) {
    let pool = WorkerPool::new(1, Arc::new(InMemoryTaskStore::new()));
    let _ = pool.enqueue(1);

    c.bench_function("enqueue_full", |b| {
        b.iter(|| black_box(pool.enqueue(black_box(2))).is_err());
    });
}

fn bench_submit_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_and_drain");
    group.sample_size(10);

    for workers in [1usize, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                let store = Arc::new(InMemoryTaskStore::new());
                let pool = Arc::new(WorkerPool::new(256, store.clone()));
                pool.start(workers).unwrap();
                let service = TaskService::builder()
                    .store(store)
                    .pool(pool.clone())
                    .work_duration(Duration::ZERO, Duration::ZERO)
                    .build()
                    .unwrap();

                for i in 0..256 {
                    let _ = black_box(service.create_task(&format!("bench-{i}"), ""));
                }
                pool.shutdown(Duration::from_secs(10)).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_enqueue, bench_rejection, bench_submit_and_drain);
criterion_main!(benches);
