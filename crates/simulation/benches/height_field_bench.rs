//! Criterion benchmarks for the per-frame hot path.
//!
//! Benchmarks:
//!   - height field recompute, 50x25 grid, full pool of 8
//!   - height field recompute, mobile profile grid and pool
//!   - height field recompute, 120x68 cell-size grid with white noise
//!   - full engine tick for each built-in variant
//!
//! Run with: cargo bench -p simulation --bench height_field_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use simulation::config::{FoamProfile, FoamVariant, NoiseConfig, NoiseKind, ValueRange};
use simulation::engine::FoamEngine;
use simulation::fluctuation::FluctuationPool;
use simulation::height_field::HeightField;
use simulation::noise_field::StaticNoiseField;
use simulation::sim_rng::FoamRng;
use simulation::viewport::{GridDims, Viewport};

fn full_pool(profile: &FoamProfile, dims: GridDims, rng: &mut FoamRng) -> FluctuationPool {
    let mut pool = FluctuationPool::new(profile.max_fluctuations);
    while !pool.is_full() {
        pool.spawn(profile, dims, rng);
    }
    pool
}

// ---------------------------------------------------------------------------
// Benchmark: HeightField::recompute
// ---------------------------------------------------------------------------

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_field_recompute");

    let profile = FoamProfile::default();
    let mut rng = FoamRng::from_seed_u64(42);

    let dims = GridDims::new(50, 25);
    let pool = full_pool(&profile, dims, &mut rng);
    let mut field = HeightField::new(dims);
    group.bench_function("perspective_50x25", |b| {
        b.iter(|| {
            field.recompute(black_box(&pool), None, false);
            black_box(field.peak())
        });
    });

    let mobile = FoamProfile::mobile_background();
    let dims = mobile.grid.dims_for(Viewport::new(390.0, 844.0));
    let pool = full_pool(&mobile, dims, &mut rng);
    let mut field = HeightField::new(dims);
    group.bench_function("perspective_mobile", |b| {
        b.iter(|| {
            field.recompute(black_box(&pool), None, false);
            black_box(field.peak())
        });
    });

    let dims = GridDims::new(120, 68);
    let noise = StaticNoiseField::generate(
        dims,
        &NoiseConfig {
            kind: NoiseKind::White,
            intensity: 0.35,
            scale: ValueRange::new(0.5, 1.0),
        },
        &mut rng,
    );
    let pool = full_pool(&profile, dims, &mut rng);
    let mut field = HeightField::new(dims);
    group.bench_function("noisy_120x68", |b| {
        b.iter(|| {
            field.recompute(black_box(&pool), Some(&noise), false);
            black_box(field.peak())
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: FoamEngine::tick
// ---------------------------------------------------------------------------

fn bench_engine_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");

    for variant in FoamVariant::ALL {
        let mut engine = FoamEngine::new(variant.settings(), Viewport::new(1920.0, 1080.0));
        // Warm up past the intro so every variant measures steady state.
        for _ in 0..600 {
            engine.tick();
        }
        group.bench_function(variant.name(), |b| {
            b.iter(|| {
                engine.tick();
                black_box(engine.heights().peak())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recompute, bench_engine_tick);
criterion_main!(benches);
