// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Particle Kinematics
// ─────────────────────────────────────────────────────────────────────
//! A single hard disc moving with constant velocity between events.
//!
//! One Euler step per tick: `position += velocity`. The x-coordinate at
//! the start of the tick is kept in `previous_x` so the partition can
//! detect midline crossings after the fact, including ones caused by
//! collision separation.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use demon_types::{ParticleKind, ParticleView, SimulationConfig};

use crate::params::{initial_speed_range, MASS_PER_RADIUS};

/// Uniform sample in `[lo, hi)`, or `lo` when the range is empty.
fn sample_range(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Spawn interval along one axis of length `extent`.
fn spawn_interval(extent: f64, margin: f64, radius: f64) -> (f64, f64) {
    if extent - margin > margin {
        (margin, extent - margin)
    } else if extent - radius > radius {
        (radius, extent - radius)
    } else {
        (0.5 * extent, 0.5 * extent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: DVec2,
    /// Pixels per tick.
    pub velocity: DVec2,
    radius: f64,
    /// x at the start of the current tick.
    pub previous_x: f64,
    /// Tick of the last billed door-area hit.
    pub last_door_hit_tick: Option<u64>,
    /// Perfect-mode latch: already billed for reaching its home chamber.
    pub charged_for_crossing: bool,
}

impl Particle {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
            previous_x: position.x,
            last_door_hit_tick: None,
            charged_for_crossing: false,
        }
    }

    /// Random position inside the spawn margin and a random heading with a
    /// speed drawn from the band biased toward `kind`.
    pub fn spawn(rng: &mut impl Rng, kind: ParticleKind, config: &SimulationConfig) -> Self {
        let radius = config.particle_radius;
        let (x_lo, x_hi) = spawn_interval(config.width, config.spawn_margin, radius);
        let (y_lo, y_hi) = spawn_interval(config.height, config.spawn_margin, radius);
        let position = DVec2::new(
            sample_range(rng, x_lo, x_hi),
            sample_range(rng, y_lo, y_hi),
        );

        let (speed_lo, speed_hi) = initial_speed_range(
            kind,
            config.speed_threshold,
            config.min_speed,
            config.max_speed,
        );
        let speed = sample_range(rng, speed_lo, speed_hi) * config.speed_multiplier;
        let heading = sample_range(rng, 0.0, std::f64::consts::TAU);

        Self::new(position, DVec2::from_angle(heading) * speed, radius)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.radius * MASS_PER_RADIUS
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Speed class, re-derived from the current velocity on every call.
    #[inline]
    pub fn classify(&self, speed_threshold: f64) -> ParticleKind {
        ParticleKind::from_speed(self.speed(), speed_threshold)
    }

    /// Mark the start of a tick. Must run before anything moves the
    /// particle that tick, collision separation included.
    #[inline]
    pub fn begin_tick(&mut self) {
        self.previous_x = self.position.x;
    }

    /// Advance one tick. Leaves `previous_x` alone.
    #[inline]
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Reflect off the outer box walls.
    ///
    /// On each axis where the leading edge passed a wall the centre is
    /// placed one radius inside it and that velocity component is negated.
    /// Returns true if any wall was hit.
    pub fn bounce_walls(&mut self, width: f64, height: f64) -> bool {
        let r = self.radius;
        let mut hit = false;

        if self.position.x + r > width {
            self.position.x = width - r;
            self.velocity.x = -self.velocity.x;
            hit = true;
        } else if self.position.x - r < 0.0 {
            self.position.x = r;
            self.velocity.x = -self.velocity.x;
            hit = true;
        }

        if self.position.y + r > height {
            self.position.y = height - r;
            self.velocity.y = -self.velocity.y;
            hit = true;
        } else if self.position.y - r < 0.0 {
            self.position.y = r;
            self.velocity.y = -self.velocity.y;
            hit = true;
        }

        hit
    }

    /// Move the centre inside a (possibly resized) box without touching
    /// the velocity.
    pub fn confine(&mut self, width: f64, height: f64) {
        let r = self.radius;
        self.position.x = self.position.x.clamp(r.min(0.5 * width), (width - r).max(0.5 * width));
        self.position.y = self
            .position
            .y
            .clamp(r.min(0.5 * height), (height - r).max(0.5 * height));
    }

    /// `0.5·m·v²` in simulation units.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass() * self.velocity.length_squared()
    }

    pub fn view(&self, speed_threshold: f64) -> ParticleView {
        ParticleView {
            x: self.position.x,
            y: self.position.y,
            vx: self.velocity.x,
            vy: self.velocity.y,
            speed: self.speed(),
            direction: self.velocity.y.atan2(self.velocity.x),
            radius: self.radius,
            kind: self.classify(speed_threshold),
        }
    }
}
