//! End-to-end properties of the sampling and lifecycle machinery.
//!
//! The statistical tests run 10,000 draws against seeded samplers, so they
//! are deterministic despite being distribution checks.

use glam::{Mat4, Vec3, Vec4};
use plume::{write_instances, ParticleEmitter, Sampler, SpawnShape};

const SAMPLES: usize = 10_000;

#[test]
fn uniform_with_equal_bounds_is_exact() {
    let mut sampler = Sampler::from_seed(1);
    for _ in 0..SAMPLES {
        assert_eq!(sampler.uniform(2.0, 2.0), 2.0);
    }
}

#[test]
fn uniform_with_reversed_bounds_stays_in_interval() {
    let mut sampler = Sampler::from_seed(2);
    for _ in 0..SAMPLES {
        let v = sampler.uniform(5.0, 1.0);
        assert!((1.0..=5.0).contains(&v), "sample {v} outside [1, 5]");
    }
}

#[test]
fn disc_sampling_is_uniform_per_area() {
    // Bin sample radii into 10 annuli of equal width. Area-uniform
    // sampling puts a fraction of ((k+1)^2 - k^2) / 100 of the samples
    // into annulus k; a (defective) uniform-radius sampler would put 1/10
    // into each. The outermost bin separates the two hypotheses by a
    // factor of ~1.9, far beyond sampling noise at 10k draws.
    let mut sampler = Sampler::from_seed(3);
    let radius = 2.0;
    let shape = SpawnShape::Disc { radius };

    let mut bins = [0usize; 10];
    for _ in 0..SAMPLES {
        let p = shape.sample(&mut sampler);
        assert_eq!(p.y, 0.0);
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert!(r <= radius + 1e-5);
        let bin = ((r / radius) * 10.0).min(9.0) as usize;
        bins[bin] += 1;
    }

    for (k, &count) in bins.iter().enumerate() {
        let expected = SAMPLES as f64 * ((k + 1).pow(2) - k.pow(2)) as f64 / 100.0;
        let observed = count as f64;
        // Generous tolerance on a binomial bin; the defective
        // uniform-radius distribution still lands far outside it.
        let sigma = (expected * (1.0 - expected / SAMPLES as f64)).sqrt();
        assert!(
            (observed - expected).abs() < 6.0 * sigma + 10.0,
            "annulus {k}: observed {observed}, expected {expected:.0}"
        );
    }
}

#[test]
fn rectangle_sampling_respects_half_extents() {
    let mut sampler = Sampler::from_seed(4);
    let shape = SpawnShape::Rectangle {
        width: 2.0,
        height: 4.0,
    };
    for _ in 0..SAMPLES {
        let p = shape.sample(&mut sampler);
        assert!(p.x.abs() <= 1.0);
        assert!(p.z.abs() <= 2.0);
        assert_eq!(p.y, 0.0);
    }
}

#[test]
fn point_sampling_is_exactly_zero() {
    let mut sampler = Sampler::from_seed(5);
    for _ in 0..SAMPLES {
        assert_eq!(SpawnShape::Point.sample(&mut sampler), Vec3::ZERO);
    }
}

#[test]
fn lifetime_bounded_by_lifespan_across_many_frames() {
    let mut emitter = ParticleEmitter::with_seed(256, 6);
    emitter.lifespan0 = 0.2;
    emitter.lifespan1 = 1.5;
    emitter.gravity = Vec3::new(0.0, -9.8, 0.0);
    emitter.velocity = Vec3::new(0.0, 3.0, 0.0);
    for frame in 0..500 {
        emitter.update(0.016);
        for p in emitter.particles() {
            assert!(
                p.lifetime <= p.lifespan,
                "frame {frame}: lifetime {} > lifespan {}",
                p.lifetime,
                p.lifespan
            );
        }
    }
}

#[test]
fn dead_particle_is_alive_after_one_update() {
    let mut emitter = ParticleEmitter::with_seed(64, 7);
    assert!(emitter.particles().iter().all(|p| !p.is_alive()));
    emitter.update(0.016);
    assert!(emitter.particles().iter().all(|p| p.is_alive()));
}

#[test]
fn half_lifespan_steps_decrease_lifetime_monotonically() {
    let mut emitter = ParticleEmitter::with_seed(1, 8);
    emitter.lifespan0 = 1.0;
    emitter.lifespan1 = 1.0;

    emitter.update(0.0);
    assert_eq!(emitter.particles()[0].lifetime, 1.0);

    emitter.update(0.5);
    assert_eq!(emitter.particles()[0].lifetime, 0.5);

    emitter.update(0.5);
    let p = emitter.particles()[0];
    // lifetime hit exactly 0: still alive, no respawn.
    assert_eq!(p.lifetime, 0.0);
    assert!(p.is_alive());
}

#[test]
fn oversized_dt_respawns_exactly_once() {
    let mut emitter = ParticleEmitter::with_seed(1, 9);
    emitter.lifespan0 = 1.0;
    emitter.lifespan1 = 1.0;
    emitter.update(0.0);

    // Would have died 1.5 times over; a single respawn lands on the fresh
    // lifespan, not on lifespan minus the overshoot.
    emitter.update(1.5);
    let p = emitter.particles()[0];
    assert_eq!(p.lifetime, 1.0);
    assert_eq!(p.lifespan, 1.0);
}

#[test]
fn last_alive_tick_does_not_move() {
    // Decrement happens before the branch, so the tick that takes lifetime
    // to exactly 0 still integrates, but the tick that kills does not.
    let mut emitter = ParticleEmitter::with_seed(1, 10);
    emitter.lifespan0 = 1.0;
    emitter.lifespan1 = 1.0;
    emitter.velocity = Vec3::new(1.0, 0.0, 0.0);
    emitter.update(0.0);

    emitter.update(1.5); // dies, respawns at origin
    let respawned = emitter.particles()[0];
    assert_eq!(respawned.position, Vec3::ZERO);
}

#[test]
fn zero_dt_update_is_a_fixed_point_for_live_particles() {
    let mut emitter = ParticleEmitter::with_seed(128, 11);
    emitter.velocity = Vec3::new(0.5, 2.0, -0.5);
    emitter.gravity = Vec3::new(0.0, -9.8, 0.0);
    emitter.update(0.016); // everything alive now
    let before: Vec<_> = emitter.particles().to_vec();
    for _ in 0..10 {
        emitter.update(0.0);
    }
    assert_eq!(emitter.particles(), &before[..]);
}

#[test]
fn marshalling_emits_capacity_instances_every_frame() {
    let mut emitter = ParticleEmitter::with_seed(333, 12);
    emitter.lifespan0 = 0.1;
    emitter.lifespan1 = 0.3;

    let mut transforms = vec![Mat4::IDENTITY; emitter.len()];
    let mut colors = vec![Vec4::ZERO; emitter.len()];

    for _ in 0..60 {
        emitter.update(0.05);
        write_instances(emitter.particles(), &mut transforms, &mut colors);
        assert_eq!(transforms.len(), 333);
        assert_eq!(colors.len(), 333);
    }
}

#[test]
fn moving_emitter_spawns_at_its_new_origin() {
    let mut emitter = ParticleEmitter::with_seed(32, 13);
    emitter.lifespan0 = 10.0;
    emitter.lifespan1 = 10.0;
    emitter.position = Vec3::new(100.0, 0.0, 0.0);
    emitter.update(0.0);
    for p in emitter.particles() {
        assert_eq!(p.position, Vec3::new(100.0, 0.0, 0.0));
    }

    // Live particles keep their world positions when the origin moves.
    emitter.position = Vec3::new(-100.0, 0.0, 0.0);
    emitter.update(0.016);
    for p in emitter.particles() {
        assert!(p.position.x > 0.0);
    }
}
