// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Simulation Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{DemonError, DemonResult};

/// One half of the box, divided by the central wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Left,
    Right,
}

impl Chamber {
    pub fn opposite(self) -> Self {
        match self {
            Chamber::Left => Chamber::Right,
            Chamber::Right => Chamber::Left,
        }
    }

    /// Chamber containing `x` for a box split at `midline`.
    /// Points exactly on the midline belong to the right chamber.
    #[inline]
    pub fn of(x: f64, midline: f64) -> Self {
        if x < midline {
            Chamber::Left
        } else {
            Chamber::Right
        }
    }
}

/// Runtime configuration for one simulation population.
///
/// Every change of population-level fields goes through a full
/// reconfiguration: particles, ledger, and history are rebuilt together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Box width in pixels. Default: 800.
    pub width: f64,

    /// Box height in pixels. Default: 600.
    pub height: f64,

    /// Particles spawned with a slow ("blue") velocity. Default: 10.
    pub blue_count: usize,

    /// Particles spawned with a fast ("red") velocity. Default: 5.
    pub red_count: usize,

    /// Radius shared by every particle. Default: 10.
    pub particle_radius: f64,

    /// Speed (pixels/tick) at or above which a particle is Fast. Default: 3.5.
    pub speed_threshold: f64,

    /// Scale applied to every sampled initial speed. Default: 1.0.
    pub speed_multiplier: f64,

    /// Autonomous gating instead of manual door control. Default: false.
    pub perfect_mode: bool,

    /// Chamber the demon sorts slow particles into. Fast particles go to
    /// the opposite one. Default: left.
    pub slow_chamber: Chamber,

    /// Door band top edge as a fraction of height. Default: 0.32.
    pub door_top_frac: f64,

    /// Door band bottom edge as a fraction of height. Default: 0.68.
    pub door_bottom_frac: f64,

    /// Entropy charged per demon measurement, kBT·ln 2. Default: 0.693.
    pub landauer_cost: f64,

    /// Ticks that must pass before the same particle is billed for
    /// another door-area hit. Default: 5.
    pub debounce_ticks: u64,

    /// Lower bound of the initial speed range. Default: 2.0.
    pub min_speed: f64,

    /// Upper bound of the initial speed range. Default: 5.0.
    pub max_speed: f64,

    /// Distance from the box edge inside which no particle spawns. Default: 50.
    pub spawn_margin: f64,

    /// Points kept in each rolling history series. Default: 300.
    pub history_capacity: usize,

    /// Bill door-area hits on top of the mode-specific charge. Default: true.
    pub charge_door_hits: bool,

    /// Fixed RNG seed for reproducible populations. Default: none.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            blue_count: 10,
            red_count: 5,
            particle_radius: 10.0,
            speed_threshold: 3.5,
            speed_multiplier: 1.0,
            perfect_mode: false,
            slow_chamber: Chamber::Left,
            door_top_frac: 0.32,
            door_bottom_frac: 0.68,
            landauer_cost: 0.693,
            debounce_ticks: 5,
            min_speed: 2.0,
            max_speed: 5.0,
            spawn_margin: 50.0,
            history_capacity: 300,
            charge_door_hits: true,
            seed: None,
        }
    }
}

/// Replace a non-finite or out-of-range value, logging the substitution.
fn sanitize_field(name: &str, value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("config: {name} is not finite, using {fallback}");
        return fallback;
    }
    if value < lo || value > hi {
        let clamped = value.clamp(lo, hi);
        log::warn!("config: {name}={value} out of range, clamping to {clamped}");
        return clamped;
    }
    value
}

impl SimulationConfig {
    pub fn total_particles(&self) -> usize {
        self.blue_count + self.red_count
    }

    /// Door band `[top, bottom]` in pixels for the current height.
    pub fn door_band(&self) -> (f64, f64) {
        (self.height * self.door_top_frac, self.height * self.door_bottom_frac)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> DemonResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(DemonError::Config(format!(
                "width must be > 0, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(DemonError::Config(format!(
                "height must be > 0, got {}",
                self.height
            )));
        }
        if !(self.particle_radius.is_finite() && self.particle_radius > 0.0) {
            return Err(DemonError::Config(format!(
                "particle_radius must be > 0, got {}",
                self.particle_radius
            )));
        }
        if 2.0 * self.particle_radius >= self.width.min(self.height) {
            return Err(DemonError::Config(format!(
                "particle diameter {} does not fit in a {}x{} box",
                2.0 * self.particle_radius,
                self.width,
                self.height
            )));
        }
        if !(self.speed_threshold.is_finite() && self.speed_threshold >= 0.0) {
            return Err(DemonError::Config(format!(
                "speed_threshold must be >= 0, got {}",
                self.speed_threshold
            )));
        }
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier >= 0.0) {
            return Err(DemonError::Config(format!(
                "speed_multiplier must be >= 0, got {}",
                self.speed_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.door_top_frac)
            || !(0.0..=1.0).contains(&self.door_bottom_frac)
            || self.door_top_frac > self.door_bottom_frac
        {
            return Err(DemonError::Config(format!(
                "door band must satisfy 0 <= top <= bottom <= 1, got [{}, {}]",
                self.door_top_frac, self.door_bottom_frac
            )));
        }
        if !(self.landauer_cost.is_finite() && self.landauer_cost >= 0.0) {
            return Err(DemonError::Config(format!(
                "landauer_cost must be >= 0, got {}",
                self.landauer_cost
            )));
        }
        if !(self.min_speed.is_finite() && self.min_speed >= 0.0) {
            return Err(DemonError::Config(format!(
                "min_speed must be >= 0, got {}",
                self.min_speed
            )));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= self.min_speed) {
            return Err(DemonError::Config(format!(
                "max_speed must be >= min_speed ({}), got {}",
                self.min_speed, self.max_speed
            )));
        }
        if !(self.spawn_margin.is_finite() && self.spawn_margin >= 0.0) {
            return Err(DemonError::Config(format!(
                "spawn_margin must be >= 0, got {}",
                self.spawn_margin
            )));
        }
        if self.history_capacity < 1 {
            return Err(DemonError::Config(format!(
                "history_capacity must be >= 1, got {}",
                self.history_capacity
            )));
        }
        Ok(())
    }

    /// Clamp every field into its valid range.
    ///
    /// The simulation never rejects a configuration; it runs the nearest
    /// valid one instead. Each substitution is logged.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut c = self.clone();

        c.width = sanitize_field("width", c.width, 1.0, f64::MAX, defaults.width);
        c.height = sanitize_field("height", c.height, 1.0, f64::MAX, defaults.height);
        let max_radius = (0.5 * c.width.min(c.height) - f64::EPSILON).max(f64::EPSILON);
        c.particle_radius = sanitize_field(
            "particle_radius",
            c.particle_radius,
            f64::EPSILON,
            max_radius,
            defaults.particle_radius.min(max_radius),
        );
        c.speed_threshold = sanitize_field(
            "speed_threshold",
            c.speed_threshold,
            0.0,
            f64::MAX,
            defaults.speed_threshold,
        );
        c.speed_multiplier = sanitize_field(
            "speed_multiplier",
            c.speed_multiplier,
            0.0,
            f64::MAX,
            defaults.speed_multiplier,
        );
        c.door_top_frac =
            sanitize_field("door_top_frac", c.door_top_frac, 0.0, 1.0, defaults.door_top_frac);
        c.door_bottom_frac = sanitize_field(
            "door_bottom_frac",
            c.door_bottom_frac,
            0.0,
            1.0,
            defaults.door_bottom_frac,
        );
        if c.door_top_frac > c.door_bottom_frac {
            log::warn!(
                "config: door band inverted [{}, {}], swapping",
                c.door_top_frac,
                c.door_bottom_frac
            );
            std::mem::swap(&mut c.door_top_frac, &mut c.door_bottom_frac);
        }
        c.landauer_cost = sanitize_field(
            "landauer_cost",
            c.landauer_cost,
            0.0,
            f64::MAX,
            defaults.landauer_cost,
        );
        c.min_speed = sanitize_field("min_speed", c.min_speed, 0.0, f64::MAX, defaults.min_speed);
        c.max_speed = sanitize_field(
            "max_speed",
            c.max_speed,
            c.min_speed,
            f64::MAX,
            defaults.max_speed.max(c.min_speed),
        );
        c.spawn_margin = sanitize_field(
            "spawn_margin",
            c.spawn_margin,
            0.0,
            f64::MAX,
            defaults.spawn_margin,
        );
        if c.history_capacity < 1 {
            log::warn!("config: history_capacity=0, using 1");
            c.history_capacity = 1;
        }
        c
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> DemonResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DemonError::Config(format!("JSON parse error: {e}")))
    }

    pub fn to_json(&self) -> DemonResult<String> {
        serde_json::to_string(self)
            .map_err(|e| DemonError::Config(format!("JSON encode error: {e}")))
    }
}
