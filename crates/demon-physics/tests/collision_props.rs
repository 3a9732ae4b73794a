//! Property-based tests for the elastic collision resolver.
//!
//! Invariants checked across random masses, contact geometries and
//! velocities:
//! - total momentum is conserved
//! - total kinetic energy is conserved
//! - the resolved pair no longer interpenetrates

use demon_physics::{resolve_pair, CollisionResolver, DVec2, Particle};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn velocity() -> impl Strategy<Value = DVec2> {
    (-8.0f64..8.0, -8.0f64..8.0).prop_map(|(x, y)| DVec2::new(x, y))
}

/// Two overlapping discs: radii, contact angle, overlap fraction, velocities.
fn overlapping_pair() -> impl Strategy<Value = (Particle, Particle)> {
    (
        2.0f64..30.0,
        2.0f64..30.0,
        0.0f64..std::f64::consts::TAU,
        0.01f64..0.99,
        velocity(),
        velocity(),
    )
        .prop_map(|(r1, r2, angle, frac, v1, v2)| {
            let origin = DVec2::new(400.0, 300.0);
            let distance = (r1 + r2) * frac;
            let a = Particle::new(origin, v1, r1);
            let b = Particle::new(origin + DVec2::from_angle(angle) * distance, v2, r2);
            (a, b)
        })
}

fn momentum(particles: &[&Particle]) -> DVec2 {
    particles
        .iter()
        .fold(DVec2::ZERO, |acc, p| acc + p.velocity * p.mass())
}

fn energy(particles: &[&Particle]) -> f64 {
    particles.iter().map(|p| p.kinetic_energy()).sum()
}

proptest! {
    #[test]
    fn momentum_conserved((mut a, mut b) in overlapping_pair()) {
        let before = momentum(&[&a, &b]);
        prop_assert!(resolve_pair(&mut a, &mut b).is_some());
        let after = momentum(&[&a, &b]);
        prop_assert!((after - before).length() <= EPS * (1.0 + before.length()));
    }

    #[test]
    fn kinetic_energy_conserved((mut a, mut b) in overlapping_pair()) {
        let before = energy(&[&a, &b]);
        resolve_pair(&mut a, &mut b);
        let after = energy(&[&a, &b]);
        prop_assert!((after - before).abs() <= EPS * (1.0 + before));
    }

    #[test]
    fn no_residual_interpenetration((mut a, mut b) in overlapping_pair()) {
        resolve_pair(&mut a, &mut b);
        let distance = (b.position - a.position).length();
        prop_assert!(distance >= a.radius() + b.radius() - 1e-6);
    }

    #[test]
    fn resolver_pass_conserves_momentum(
        seeds in prop::collection::vec((50.0f64..250.0, 50.0f64..250.0, velocity()), 2..12)
    ) {
        let mut particles: Vec<Particle> = seeds
            .into_iter()
            .map(|(x, y, v)| Particle::new(DVec2::new(x, y), v, 10.0))
            .collect();
        let before = particles.iter().fold(DVec2::ZERO, |acc, p| acc + p.velocity * p.mass());
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&mut particles);
        let after = particles.iter().fold(DVec2::ZERO, |acc, p| acc + p.velocity * p.mass());
        prop_assert!((after - before).length() <= 1e-9 * (1.0 + before.length()));
    }
}
