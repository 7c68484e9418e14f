use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use frozen_map::EntryTable;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("entry_table::insert_fresh_100k", |b| {
        b.iter_batched(
            EntryTable::<String, u64>::new,
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.insert(key(x), i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_replace_100k(c: &mut Criterion) {
    c.bench_function("entry_table::insert_replace_100k", |b| {
        b.iter_batched(
            || {
                let mut t = EntryTable::new();
                for (i, x) in lcg(2).take(100_000).enumerate() {
                    t.insert(key(x), i as u64);
                }
                t
            },
            |mut t| {
                // Same keys again: every insert hits an occupied slot.
                for (i, x) in lcg(2).take(100_000).enumerate() {
                    t.insert(key(x), (i as u64) << 1);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit(c: &mut Criterion) {
    c.bench_function("entry_table::find_hit", |b| {
        let mut t = EntryTable::new();
        let keys: Vec<String> = lcg(5).take(50_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k.clone(), i as u64);
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.find(k.as_str()));
        })
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    c.bench_function("entry_table::iter_100k", |b| {
        let mut t = EntryTable::new();
        for (i, x) in lcg(9).take(100_000).enumerate() {
            t.insert(key(x), i as u64);
        }
        b.iter(|| {
            let mut sum = 0u64;
            for (_, v) in t.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(6))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_replace_100k, bench_find_hit, bench_iter_100k
}
criterion_main!(benches);
