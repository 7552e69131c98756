use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rh_hashmap::RobinHashMap;
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

fn filled(seed: u64, n: usize) -> (RobinHashMap<String, u64>, Vec<String>) {
    let mut m = RobinHashMap::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.insert(k.clone(), i as u64);
    }
    (m, keys)
}

// `count` pseudo-random picks out of `keys`, repeats allowed.
fn sample(keys: &[String], count: usize) -> Vec<String> {
    let n = keys.len();
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            keys[(s as usize) % n].clone()
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("robin::insert_fresh_100k", |b| {
        b.iter_batched(
            RobinHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_warm_100k(c: &mut Criterion) {
    c.bench_function("robin::insert_warm_100k", |b| {
        b.iter_batched(
            || {
                // Pre-grow, then empty it by removing.
                let (mut m, keys) = filled(2, 110_000);
                for k in &keys {
                    m.remove(k);
                }
                m
            },
            |mut m| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("robin::insert_presized_100k", |b| {
        b.iter_batched(
            || RobinHashMap::<String, u64>::with_capacity(100_000),
            |mut m| {
                for (i, x) in lcg(4).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("robin::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (m, keys) = filled(5, 110_000);
                let to_remove = sample(&keys, 10_000);
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

// Insert/remove churn at steady size; exercises tombstone reuse and compaction.
fn bench_churn_100k(c: &mut Criterion) {
    c.bench_function("robin::churn_100k_at_10k", |b| {
        b.iter_batched(
            || filled(17, 10_000),
            |(mut m, mut keys)| {
                let mut next = lcg(19);
                for i in 0..100_000usize {
                    let slot = i % keys.len();
                    m.remove(&keys[slot]);
                    let fresh = key(next.next().unwrap_or_default());
                    m.insert(fresh.clone(), i as u64);
                    keys[slot] = fresh;
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_10k(c: &mut Criterion) {
    c.bench_function("robin::find_hit_10k_on_100k", |b| {
        let (m, keys) = filled(7, 100_000);
        let queries = sample(&keys, 10_000);
        b.iter(|| {
            for k in &queries {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_find_miss_10k(c: &mut Criterion) {
    c.bench_function("robin::find_miss_10k_on_100k", |b| {
        let (m, _) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap_or_default());
                black_box(m.find(&k));
            }
        })
    });
}

fn bench_iter_and_iter_mut(c: &mut Criterion) {
    c.bench_function("robin::iter_all_100k", |b| {
        let (m, _) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("robin::cursor_walk_100k", |b| {
        let (m, _) = filled(1000, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            let mut cur = m.begin();
            while cur != m.end() {
                if let Some(v) = cur.value(&m) {
                    sum = sum.wrapping_add(*v);
                }
                cur = cur.advance(&m);
            }
            black_box(sum)
        })
    });

    c.bench_function("robin::iter_mut_increment_all_100k", |b| {
        b.iter_batched(
            || filled(1001, 100_000).0,
            |mut m| {
                for (_k, v) in m.iter_mut() {
                    *v = v.wrapping_add(1);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_warm_100k, bench_insert_presized_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_churn_100k,
              bench_find_hit_10k,
              bench_find_miss_10k,
              bench_iter_and_iter_mut
}
criterion_main!(benches_insert, benches_ops);
