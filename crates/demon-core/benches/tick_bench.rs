// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Tick and Entropy Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the per-tick hot path and the entropy model.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use demon_core::SimulationClock;
use demon_observers::{chamber_entropy, log_factorial, microstate_count, multiplicity_curve};
use demon_types::SimulationConfig;

fn config(blue: usize, red: usize, perfect_mode: bool) -> SimulationConfig {
    SimulationConfig {
        blue_count: blue,
        red_count: red,
        perfect_mode,
        seed: Some(2026),
        ..Default::default()
    }
}

// ── SimulationClock.tick() ──────────────────────────────────────────

fn bench_tick_default(c: &mut Criterion) {
    let mut clock = SimulationClock::new(config(10, 5, false));
    clock.toggle_door();
    c.bench_function("tick_15_particles", |b| b.iter(|| black_box(clock.tick())));
}

fn bench_tick_perfect_100(c: &mut Criterion) {
    let mut clock = SimulationClock::new(config(50, 50, true));
    c.bench_function("tick_100_particles_perfect", |b| {
        b.iter(|| black_box(clock.tick()))
    });
}

// ── Entropy model ───────────────────────────────────────────────────

fn bench_log_factorial(c: &mut Criterion) {
    c.bench_function("log_factorial_99", |b| {
        b.iter(|| log_factorial(black_box(99.0)))
    });
    c.bench_function("log_factorial_stirling", |b| {
        b.iter(|| log_factorial(black_box(5000.0)))
    });
}

fn bench_chamber_entropy(c: &mut Criterion) {
    let n = microstate_count(800.0, 600.0, 10.0);
    c.bench_function("chamber_entropy", |b| {
        b.iter(|| chamber_entropy(black_box(n), black_box(20.0), black_box(10.0)))
    });
}

fn bench_multiplicity_curve(c: &mut Criterion) {
    let n = microstate_count(800.0, 600.0, 10.0);
    c.bench_function("multiplicity_curve_50", |b| {
        b.iter(|| multiplicity_curve(black_box(n), 50, 50, 25))
    });
}

criterion_group!(
    benches,
    bench_tick_default,
    bench_tick_perfect_100,
    bench_log_factorial,
    bench_chamber_entropy,
    bench_multiplicity_curve,
);
criterion_main!(benches);
