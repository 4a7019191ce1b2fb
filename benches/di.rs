use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ferrous_registry::*;

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let token: Token<u64> = Token::new("Answer");
    let registry = ServiceRegistry::new();
    registry.register_instance(&token, 42u64);

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = registry.resolve(&token).unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    let token: Token<ExpensiveToCreate> = Token::new("Expensive");

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let registry = ServiceRegistry::new();
                registry.register_singleton(
                    &token,
                    |_| Ok(ExpensiveToCreate { data: (0..1000).collect() }),
                    ServiceOptions::new(),
                );
                registry
            },
            |registry| {
                let v = registry.resolve(&token).unwrap();
                black_box(v.data.len());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_scoped_vs_transient(c: &mut Criterion) {
    struct Service {
        data: [u8; 64],
    }

    let scoped: Token<Service> = Token::new("Scoped");
    let transient: Token<Service> = Token::new("Transient");

    let registry = ServiceRegistry::new();
    registry
        .register_scoped(&scoped, |_| Ok(Service { data: [0; 64] }), ServiceOptions::new())
        .register_transient(&transient, |_| Ok(Service { data: [0; 64] }), ServiceOptions::new());

    let mut group = c.benchmark_group("scoped_vs_transient");

    group.bench_function("scoped_hit", |b| {
        b.iter(|| {
            let v = registry.resolve(&scoped).unwrap();
            black_box(&v.data);
        })
    });

    group.bench_function("transient", |b| {
        b.iter(|| {
            let v = registry.resolve(&transient).unwrap();
            black_box(&v.data);
        })
    });

    group.finish();
}

/// Registers a transient chain `T0 <- T1 <- ... <- T{depth-1}`.
fn chain(depth: usize) -> (ServiceRegistry, Vec<Token<u64>>) {
    let tokens: Vec<Token<u64>> = (0..depth).map(|_| Token::new("Link")).collect();
    let registry = ServiceRegistry::new();
    for (i, token) in tokens.iter().enumerate() {
        let options = match i {
            0 => ServiceOptions::transient(),
            _ => ServiceOptions::transient().depends_on(&tokens[i - 1]),
        };
        registry.register(
            token,
            |deps| match deps.len() {
                0 => Ok(0),
                _ => Ok(*deps.get::<u64>(0)? + 1),
            },
            options,
        );
    }
    (registry, tokens)
}

fn bench_resolution_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution_depth");

    for &depth in &[1usize, 8, 32] {
        let (registry, tokens) = chain(depth);
        let top = tokens[depth - 1];
        group.bench_with_input(BenchmarkId::new("transient_chain", depth), &depth, |b, _| {
            b.iter(|| {
                let v = registry.resolve(&top).unwrap();
                black_box(v);
            })
        });
    }

    group.finish();
}

fn bench_circular_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_detection");

    for &length in &[2usize, 8] {
        let tokens: Vec<Token<()>> = (0..length).map(|_| Token::new("Ring")).collect();
        let registry = ServiceRegistry::new();
        for (i, token) in tokens.iter().enumerate() {
            let next = tokens[(i + 1) % length];
            registry.register(token, |_| Ok(()), ServiceOptions::new().depends_on(&next));
        }

        group.bench_with_input(BenchmarkId::new("ring", length), &length, |b, _| {
            b.iter(|| {
                let err = registry.resolve(&tokens[0]).unwrap_err();
                black_box(err);
            })
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    for &depth in &[10usize, 100] {
        let (registry, _) = chain(depth);
        group.bench_with_input(BenchmarkId::new("chain", depth), &depth, |b, _| {
            b.iter(|| black_box(registry.validate().is_valid()))
        });
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_large_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_registry");

    for &service_count in &[10usize, 100, 1000] {
        let registry = ServiceRegistry::new();
        let baseline: Token<u64> = Token::new("Baseline");
        registry.register_instance(&baseline, 42u64);

        for i in 0..service_count {
            let token: Token<u32> = Token::new("Filler");
            let value = i as u32;
            registry.register_singleton(&token, move |_| Ok(value), ServiceOptions::new());
        }

        group.bench_with_input(
            BenchmarkId::new("resolve_from_large_registry", service_count),
            &service_count,
            |b, _| {
                b.iter(|| {
                    let v = registry.resolve(&baseline).unwrap();
                    black_box(v);
                })
            },
        );
    }

    group.finish();
}

fn bench_register_and_clear(c: &mut Criterion) {
    let tokens: Vec<Token<u64>> = (0..100).map(|_| Token::new("Service")).collect();

    c.bench_function("register_initialize_clear_100", |b| {
        b.iter(|| {
            let registry = ServiceRegistry::new();
            for (i, token) in tokens.iter().enumerate() {
                let value = i as u64;
                registry.register_singleton(token, move |_| Ok(value), ServiceOptions::new());
            }
            black_box(registry.initialize_all().initialized.len());
            registry.clear();
        })
    });
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_scoped_vs_transient,
    bench_resolution_depth,
    bench_circular_detection
);

criterion_group!(macro_benches, bench_validate, bench_large_registry, bench_register_and_clear);

criterion_main!(micro_benches, macro_benches);
