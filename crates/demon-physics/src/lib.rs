// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Particle Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Particle physics for the two-chamber box: single-step Euler
//! kinematics with reflecting walls, and pairwise elastic collision
//! resolution for unequal masses.

pub mod collision;
pub mod params;
pub mod particle;

pub use collision::{resolve_pair, CollisionResolver, Contact};
pub use params::{initial_speed_range, MASS_PER_RADIUS};
pub use particle::Particle;

/// 2D vector type used for positions and velocities.
pub use glam::DVec2;
