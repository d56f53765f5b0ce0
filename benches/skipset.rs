use criterion::{Bencher, Criterion, black_box};
use rand::prelude::*;
use skipset::SkipSet;

fn bench_insert(b: &mut Bencher, base: usize, inserts: usize) {
    let mut set: SkipSet<u32> = SkipSet::with_capacity(base + inserts);
    let mut rng = SmallRng::from_rng(&mut rand::rng());

    for _ in 0..base {
        set.insert(rng.random());
    }

    b.iter(|| {
        for _ in 0..inserts {
            set.insert(rng.random());
        }
    });
}

fn bench_contains(b: &mut Bencher, size: usize) {
    let mut set: SkipSet<u32> = SkipSet::with_capacity(size);
    let mut rng = SmallRng::from_rng(&mut rand::rng());

    while set.len() < size {
        set.insert(rng.random());
    }

    b.iter(|| {
        black_box(set.contains(&rng.random()));
    });
}

pub fn benchmark(c: &mut Criterion) {
    c.bench_function("SkipSet select", |b| {
        let size = 100_000;
        let set: SkipSet<_> = (0..size).collect();
        b.iter(|| {
            for i in 0..size {
                assert_eq!(set[i], i);
            }
        })
    });

    c.bench_function("SkipSet rank", |b| {
        let size = 100_000;
        let set: SkipSet<_> = (0..size).collect();
        b.iter(|| {
            for i in (0..size).step_by(7) {
                assert_eq!(set.rank(&i), Some(i));
            }
        })
    });

    c.bench_function("SkipSet insert 10 (empty)", |b| {
        bench_insert(b, 0, 10);
    });
    c.bench_function("SkipSet insert 100 (empty)", |b| {
        bench_insert(b, 0, 100);
    });
    c.bench_function("SkipSet insert 10 (100k)", |b| {
        bench_insert(b, 100_000, 10);
    });
    c.bench_function("SkipSet insert 100 (100k)", |b| {
        bench_insert(b, 100_000, 100);
    });

    c.bench_function("SkipSet contains (100k)", |b| {
        bench_contains(b, 100_000);
    });

    c.bench_function("SkipSet iter (100k)", |b| {
        let set: SkipSet<_> = (0..100_000).collect();
        b.iter(|| {
            for entry in &set {
                black_box(entry);
            }
        })
    });
}
