//! Benchmarks for the hot per-frame paths: pool update and instance
//! marshalling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, Vec3, Vec4};
use plume::{write_instances, ParticleEmitter, SpawnShape};

fn bench_emitter(capacity: usize) -> ParticleEmitter {
    let mut emitter = ParticleEmitter::with_seed(capacity, 42);
    emitter.spawn_shape = SpawnShape::Disc { radius: 0.5 };
    emitter.velocity = Vec3::new(0.0, 2.0, 0.0);
    emitter.delta_velocity0 = Vec3::splat(-0.5);
    emitter.delta_velocity1 = Vec3::splat(0.5);
    emitter.gravity = Vec3::new(0.0, -9.8, 0.0);
    emitter.lifespan0 = 0.5;
    emitter.lifespan1 = 2.0;
    emitter
}

fn update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter_update");
    for capacity in [1_000usize, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut emitter = bench_emitter(capacity);
                // Warm the pool so the steady-state mix of integration and
                // respawn is what gets measured.
                for _ in 0..120 {
                    emitter.update(0.016);
                }
                b.iter(|| {
                    emitter.update(black_box(0.016));
                });
            },
        );
    }
    group.finish();
}

fn marshalling_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_instances");
    for capacity in [1_000usize, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut emitter = bench_emitter(capacity);
                emitter.update(0.016);
                let mut transforms = vec![Mat4::IDENTITY; capacity];
                let mut colors = vec![Vec4::ZERO; capacity];
                b.iter(|| {
                    write_instances(
                        black_box(emitter.particles()),
                        &mut transforms,
                        &mut colors,
                    );
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, update_benchmark, marshalling_benchmark);
criterion_main!(benches);
