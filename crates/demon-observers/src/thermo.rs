// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Thermodynamics Observer
// ─────────────────────────────────────────────────────────────────────
//! Kinetic energy and equipartition temperature for the whole box and
//! for each chamber.
//!
//! Per particle: E = 0.5 · (m · MASS_SCALE) · (|v| · SPEED_SCALE)²  [J]
//! Per group:    T = (2/3) · E / (N · k_B) · TEMPERATURE_DISPLAY_SCALE

use serde::{Deserialize, Serialize};

use demon_physics::params::{
    ENERGY_DISPLAY_SCALE, J_TO_EV, K_B, MASS_SCALE, SPEED_SCALE, TEMPERATURE_DISPLAY_SCALE,
};
use demon_physics::Particle;
use demon_types::Chamber;

/// Kinetic energy of one particle in joules.
#[inline]
pub fn particle_energy(particle: &Particle) -> f64 {
    let speed = particle.speed() * SPEED_SCALE;
    let mass = particle.mass() * MASS_SCALE;
    0.5 * mass * speed * speed
}

/// Equipartition temperature of `count` particles holding `energy` joules.
/// Zero when either is zero.
pub fn temperature(energy: f64, count: usize) -> f64 {
    if count == 0 || energy <= 0.0 || !energy.is_finite() {
        return 0.0;
    }
    (2.0 / 3.0) * energy / (count as f64 * K_B) * TEMPERATURE_DISPLAY_SCALE
}

/// Joules to display-scaled electron-volts.
#[inline]
pub fn energy_ev(energy: f64) -> f64 {
    energy * J_TO_EV * ENERGY_DISPLAY_SCALE
}

/// Energy and temperature of one group of particles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupReading {
    pub count: usize,
    /// Joules.
    pub energy: f64,
    /// Kelvin, display-scaled.
    pub temperature: f64,
}

impl GroupReading {
    fn add(&mut self, energy: f64) {
        self.count += 1;
        self.energy += energy;
    }

    fn finish(&mut self) {
        self.temperature = temperature(self.energy, self.count);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermoReading {
    pub system: GroupReading,
    pub left: GroupReading,
    pub right: GroupReading,
}

impl ThermoReading {
    pub fn total_energy_ev(&self) -> f64 {
        energy_ev(self.system.energy)
    }
}

/// Holds the most recent reading between ticks.
#[derive(Debug, Clone, Default)]
pub struct ThermodynamicsObserver {
    last: ThermoReading,
    observations: u64,
}

impl ThermodynamicsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure `particles` split at `midline` and keep the result.
    pub fn observe(&mut self, particles: &[Particle], midline: f64) -> ThermoReading {
        let mut reading = ThermoReading::default();
        for particle in particles {
            let energy = particle_energy(particle);
            reading.system.add(energy);
            match Chamber::of(particle.position.x, midline) {
                Chamber::Left => reading.left.add(energy),
                Chamber::Right => reading.right.add(energy),
            }
        }
        reading.system.finish();
        reading.left.finish();
        reading.right.finish();

        self.last = reading;
        self.observations += 1;
        reading
    }

    pub fn reading(&self) -> &ThermoReading {
        &self.last
    }

    pub fn observations(&self) -> u64 {
        self.observations
    }

    pub fn reset(&mut self) {
        self.last = ThermoReading::default();
        self.observations = 0;
    }
}
