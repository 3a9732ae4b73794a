// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Chamber Partition + Door State Machine
// ─────────────────────────────────────────────────────────────────────
//! The central wall, its door, and the rules for passing through it.
//!
//! A particle crosses when its x moved strictly across the midline since
//! the start of the tick. A crossing whose y lies strictly inside the
//! door band is a door-area hit.
//!
//! - Normal mode: a crossing passes only if the door is open and the
//!   crossing is inside the band.
//! - Perfect mode: a crossing passes only inside the band and toward the
//!   particle's home chamber. The door opens by itself each tick iff some
//!   particle inside the band is heading home.
//!
//! A rejected crossing puts the particle back one radius from the midline
//! on its original side with its x-velocity pointing away from the wall.

use demon_physics::Particle;
use demon_types::{Chamber, SimulationConfig};

/// A midline crossing detected after integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub from: Chamber,
    pub to: Chamber,
    /// y strictly inside the door band.
    pub in_door_band: bool,
}

#[derive(Debug, Clone)]
pub struct ChamberPartition {
    width: f64,
    door_top_frac: f64,
    door_bottom_frac: f64,
    door_top: f64,
    door_bottom: f64,
    door_open: bool,
    perfect_mode: bool,
    slow_chamber: Chamber,
    speed_threshold: f64,
    debounce_ticks: u64,
}

impl ChamberPartition {
    /// Door starts closed.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let (door_top, door_bottom) = config.door_band();
        Self {
            width: config.width,
            door_top_frac: config.door_top_frac,
            door_bottom_frac: config.door_bottom_frac,
            door_top,
            door_bottom,
            door_open: false,
            perfect_mode: config.perfect_mode,
            slow_chamber: config.slow_chamber,
            speed_threshold: config.speed_threshold,
            debounce_ticks: config.debounce_ticks,
        }
    }

    #[inline]
    pub fn midline(&self) -> f64 {
        0.5 * self.width
    }

    /// `(top, bottom)` in pixels.
    pub fn door_band(&self) -> (f64, f64) {
        (self.door_top, self.door_bottom)
    }

    #[inline]
    pub fn in_door_band(&self, y: f64) -> bool {
        y > self.door_top && y < self.door_bottom
    }

    pub fn is_open(&self) -> bool {
        self.door_open
    }

    pub fn perfect_mode(&self) -> bool {
        self.perfect_mode
    }

    /// Manual door control. Ignored in perfect mode; returns whether the
    /// request was applied.
    pub fn set_open(&mut self, open: bool) -> bool {
        if self.perfect_mode {
            log::debug!("manual door control ignored in perfect mode");
            return false;
        }
        self.door_open = open;
        true
    }

    pub fn toggle(&mut self) -> bool {
        self.set_open(!self.door_open)
    }

    pub fn set_perfect_mode(&mut self, enabled: bool) {
        self.perfect_mode = enabled;
    }

    /// New box dimensions. The door band keeps its fractions of the height.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.door_top = height * self.door_top_frac;
        self.door_bottom = height * self.door_bottom_frac;
    }

    /// Chamber the demon sorts `particle` into, by its current speed.
    #[inline]
    pub fn home_of(&self, particle: &Particle) -> Chamber {
        particle
            .classify(self.speed_threshold)
            .home(self.slow_chamber)
    }

    /// x-velocity points toward the particle's home chamber.
    pub fn heading_home(&self, particle: &Particle) -> bool {
        match self.home_of(particle) {
            Chamber::Left => particle.velocity.x < 0.0,
            Chamber::Right => particle.velocity.x > 0.0,
        }
    }

    /// Perfect-mode gating. Opens the door iff some particle inside the
    /// band is heading home; a no-op in normal mode. Returns the door state.
    pub fn gate(&mut self, particles: &[Particle]) -> bool {
        if self.perfect_mode {
            self.door_open = particles
                .iter()
                .any(|p| self.in_door_band(p.position.y) && self.heading_home(p));
        }
        self.door_open
    }

    /// Strict midline crossing between `previous_x` and the current x.
    pub fn detect_crossing(&self, particle: &Particle) -> Option<Crossing> {
        let mid = self.midline();
        let (prev, x) = (particle.previous_x, particle.position.x);
        let (from, to) = if prev < mid && x > mid {
            (Chamber::Left, Chamber::Right)
        } else if prev > mid && x < mid {
            (Chamber::Right, Chamber::Left)
        } else {
            return None;
        };
        Some(Crossing {
            from,
            to,
            in_door_band: self.in_door_band(particle.position.y),
        })
    }

    /// Whether the wall lets this crossing through.
    pub fn permits(&self, particle: &Particle, crossing: &Crossing) -> bool {
        if !crossing.in_door_band {
            return false;
        }
        if self.perfect_mode {
            crossing.to == self.home_of(particle)
        } else {
            self.door_open
        }
    }

    /// Send a rejected particle back to its side of the wall.
    pub fn reflect(&self, particle: &mut Particle, crossing: &Crossing) {
        let mid = self.midline();
        let vx = particle.velocity.x.abs();
        (particle.position.x, particle.velocity.x) = match crossing.from {
            Chamber::Left => (mid - particle.radius(), -vx),
            Chamber::Right => (mid + particle.radius(), vx),
        };
    }

    /// Whether the demon is measuring door-area hits right now: always in
    /// perfect mode, only while open in normal mode.
    pub fn measures_door_hits(&self) -> bool {
        self.perfect_mode || self.door_open
    }

    /// Debounced door-area hit. Records `tick` and returns true when more
    /// than the debounce window has passed since the last recorded hit.
    pub fn register_door_hit(&self, particle: &mut Particle, tick: u64) -> bool {
        match particle.last_door_hit_tick {
            Some(last) if tick.saturating_sub(last) <= self.debounce_ticks => false,
            _ => {
                particle.last_door_hit_tick = Some(tick);
                true
            }
        }
    }

    /// Resolve a possible crossing for one freshly integrated particle.
    ///
    /// Returns the crossing, if any, after applying the wall. Door-hit
    /// billing is left to the caller.
    pub fn enforce(&self, particle: &mut Particle) -> Option<Crossing> {
        let crossing = self.detect_crossing(particle)?;
        if !self.permits(particle, &crossing) {
            self.reflect(particle, &crossing);
        }
        Some(crossing)
    }
}
