// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Elastic Collision Resolver
// ─────────────────────────────────────────────────────────────────────
//! Pairwise hard-disc collisions.
//!
//! For every unordered pair `i < j` whose centres are closer than the sum
//! of radii:
//!
//!   1. Separation: each disc is pushed back by half the overlap along the
//!      line of centres.
//!   2. Impulse: velocities are split into normal and tangential parts.
//!      Tangential parts pass through unchanged (frictionless); normal
//!      parts follow the 1D elastic formula for unequal masses
//!        v1n' = (v1n(m1 − m2) + 2·m2·v2n) / (m1 + m2)
//!
//! Pairs are visited in index order and each sees the mutations of the
//! pairs before it in the same pass.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// A resolved contact between particles `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    /// Interpenetration depth before separation.
    pub overlap: f64,
}

/// Resolve one pair in place. Returns the overlap if they collided.
///
/// Coincident centres have no defined line of centres; the pair is left
/// untouched.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn resolve_pair(p1: &mut Particle, p2: &mut Particle) -> Option<f64> {
    let delta: DVec2 = p2.position - p1.position;
    let distance = delta.length();
    let min_distance = p1.radius() + p2.radius();

    if !(distance < min_distance) {
        return None;
    }
    if distance == 0.0 {
        log::debug!("collision skipped: coincident centres at {:?}", p1.position);
        return None;
    }

    // 1. Separation
    let overlap = min_distance - distance;
    let normal = delta / distance;
    let nudge = normal * (0.5 * overlap);
    p1.position -= nudge;
    p2.position += nudge;

    // 2. Impulse along the normal
    let tangent = normal.perp();
    let (m1, m2) = (p1.mass(), p2.mass());

    let v1n = normal.dot(p1.velocity);
    let v1t = tangent.dot(p1.velocity);
    let v2n = normal.dot(p2.velocity);
    let v2t = tangent.dot(p2.velocity);

    let total_mass = m1 + m2;
    let v1n_after = (v1n * (m1 - m2) + 2.0 * m2 * v2n) / total_mass;
    let v2n_after = (v2n * (m2 - m1) + 2.0 * m1 * v1n) / total_mass;

    // 3. Recompose
    p1.velocity = normal * v1n_after + tangent * v1t;
    p2.velocity = normal * v2n_after + tangent * v2t;

    Some(overlap)
}

/// All-pairs collision pass with a reusable contact buffer.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    contacts: Vec<Contact>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every overlapping pair once, in `(i, j)` index order.
    ///
    /// Returns the contacts resolved in this pass.
    pub fn resolve(&mut self, particles: &mut [Particle]) -> &[Contact] {
        self.contacts.clear();
        let n = particles.len();
        for i in 0..n {
            let (head, tail) = particles.split_at_mut(i + 1);
            let p1 = &mut head[i];
            for (offset, p2) in tail.iter_mut().enumerate() {
                if let Some(overlap) = resolve_pair(p1, p2) {
                    self.contacts.push(Contact {
                        a: i,
                        b: i + 1 + offset,
                        overlap,
                    });
                }
            }
        }
        &self.contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(x: f64, y: f64, vx: f64, vy: f64, r: f64) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::new(vx, vy), r)
    }

    #[test]
    fn test_equal_mass_head_on_exchanges_velocities() {
        let mut a = disc(100.0, 100.0, 2.0, 0.0, 10.0);
        let mut b = disc(115.0, 100.0, -2.0, 0.0, 10.0);
        assert!(resolve_pair(&mut a, &mut b).is_some());
        assert!((a.velocity - DVec2::new(-2.0, 0.0)).length() < 1e-12);
        assert!((b.velocity - DVec2::new(2.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_separation_removes_overlap_symmetrically() {
        let mut a = disc(100.0, 100.0, 0.0, 0.0, 10.0);
        let mut b = disc(112.0, 100.0, 0.0, 0.0, 10.0);
        let overlap = resolve_pair(&mut a, &mut b).unwrap();
        assert!((overlap - 8.0).abs() < 1e-12);
        assert!((a.position.x - 96.0).abs() < 1e-12);
        assert!((b.position.x - 116.0).abs() < 1e-12);
        assert!((b.position - a.position).length() >= 20.0 - 1e-9);
    }

    #[test]
    fn test_tangential_component_unchanged() {
        // Glancing contact along x; the y components are tangential.
        let mut a = disc(0.0, 0.0, 1.0, 3.0, 10.0);
        let mut b = disc(18.0, 0.0, -1.0, -0.5, 10.0);
        resolve_pair(&mut a, &mut b);
        assert!((a.velocity.y - 3.0).abs() < 1e-12);
        assert!((b.velocity.y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unequal_mass_conserves_momentum_and_energy() {
        let mut heavy = disc(0.0, 0.0, 1.0, 0.5, 20.0);
        let mut light = disc(25.0, 5.0, -3.0, 1.0, 8.0);
        let p_before = heavy.velocity * heavy.mass() + light.velocity * light.mass();
        let e_before = heavy.kinetic_energy() + light.kinetic_energy();
        resolve_pair(&mut heavy, &mut light).unwrap();
        let p_after = heavy.velocity * heavy.mass() + light.velocity * light.mass();
        let e_after = heavy.kinetic_energy() + light.kinetic_energy();
        assert!((p_after - p_before).length() < 1e-12);
        assert!((e_after - e_before).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_centres_skipped() {
        let mut a = disc(50.0, 50.0, 1.0, 0.0, 10.0);
        let mut b = disc(50.0, 50.0, -1.0, 0.0, 10.0);
        assert!(resolve_pair(&mut a, &mut b).is_none());
        assert_eq!(a.velocity, DVec2::new(1.0, 0.0));
        assert_eq!(b.position, DVec2::new(50.0, 50.0));
    }

    #[test]
    fn test_touching_is_not_a_collision() {
        let mut a = disc(0.0, 0.0, 1.0, 0.0, 10.0);
        let mut b = disc(20.0, 0.0, -1.0, 0.0, 10.0);
        assert!(resolve_pair(&mut a, &mut b).is_none());
    }

    #[test]
    fn test_resolver_reports_index_ordered_contacts() {
        let mut particles = vec![
            disc(100.0, 100.0, 1.0, 0.0, 10.0),
            disc(400.0, 400.0, 0.0, 0.0, 10.0),
            disc(110.0, 100.0, -1.0, 0.0, 10.0),
        ];
        let mut resolver = CollisionResolver::new();
        let contacts = resolver.resolve(&mut particles).to_vec();
        assert_eq!(contacts.len(), 1);
        assert_eq!((contacts[0].a, contacts[0].b), (0, 2));
    }

    #[test]
    fn test_resolver_empty_and_single() {
        let mut resolver = CollisionResolver::new();
        assert!(resolver.resolve(&mut []).is_empty());
        let mut one = vec![disc(0.0, 0.0, 1.0, 1.0, 10.0)];
        assert!(resolver.resolve(&mut one).is_empty());
    }
}
