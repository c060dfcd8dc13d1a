//! Criterion benchmarks for the triage queue engine.
//!
//! Workloads are generated with a seeded RNG so runs are comparable.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_triage::{Attributes, EntityId, TriageQueue};

// ===========================================================================
// Helpers
// ===========================================================================

fn random_priorities(n: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(1..=3)).collect()
}

fn filled_queue(n: usize) -> (TriageQueue, Vec<EntityId>) {
    let mut queue = TriageQueue::new();
    let ids = random_priorities(n, 42)
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            queue
                .insert(Attributes::new(format!("patient-{i}"), 40, "General"), p)
                .unwrap()
        })
        .collect();
    (queue, ids)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[100usize, 1_000, 10_000] {
        let priorities = random_priorities(n, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &priorities, |b, ps| {
            b.iter(|| {
                let mut queue = TriageQueue::new();
                for &p in ps {
                    queue.insert(Attributes::default(), black_box(p)).unwrap();
                }
                black_box(queue)
            })
        });
    }
    group.finish();
}

fn bench_remove_head(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_head_drain");
    for &n in &[100usize, 1_000, 10_000] {
        let (queue, _) = filled_queue(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &queue, |b, q| {
            b.iter(|| {
                let mut q = q.clone();
                while let Ok(entity) = q.remove_head() {
                    black_box(entity);
                }
            })
        });
    }
    group.finish();
}

fn bench_remove_by_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_by_id");
    for &n in &[100usize, 1_000, 10_000] {
        let (queue, ids) = filled_queue(n);
        let mut rng = StdRng::seed_from_u64(99);
        let targets: Vec<EntityId> = (0..n / 2)
            .map(|_| ids[rng.random_range(0..ids.len())].clone())
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(queue, targets),
            |b, (q, targets)| {
                b.iter(|| {
                    let mut q = q.clone();
                    for id in targets {
                        let _ = black_box(q.remove_by_id(id.as_str()));
                    }
                })
            },
        );
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for &n in &[100usize, 1_000, 10_000] {
        let (queue, ids) = filled_queue(n);
        let mut rng = StdRng::seed_from_u64(5);
        let changes: Vec<(EntityId, u8)> = (0..n / 2)
            .map(|_| {
                (
                    ids[rng.random_range(0..ids.len())].clone(),
                    rng.random_range(1..=3),
                )
            })
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(queue, changes),
            |b, (q, changes)| {
                b.iter(|| {
                    let mut q = q.clone();
                    for (id, p) in changes {
                        let _ = black_box(q.update(id.as_str(), Attributes::default(), *p).is_ok());
                    }
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_remove_head,
    bench_remove_by_id,
    bench_update
);
criterion_main!(benches);
