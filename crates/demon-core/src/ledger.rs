// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Demon Entropy Ledger
// ─────────────────────────────────────────────────────────────────────
//! Landauer bookkeeping for the demon.
//!
//! Every measurement the demon makes costs `kBT·ln 2`. Three sources feed
//! one accumulator:
//!   - door opening (rising edge of the door state, normal mode)
//!   - a perfect-mode particle reaching its home chamber
//!   - a debounced door-area hit
//!
//! The accumulator is clamped to `[0, budget]` after every increment.
//! The budget is the equilibrium system entropy of the population.

use serde::{Deserialize, Serialize};

use demon_observers::{max_system_entropy, maximum_entropy, microstate_count};
use demon_types::{clamp_finite, SimulationConfig};

/// What the demon was charged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeSource {
    DoorOpen,
    Crossing,
    DoorHit,
}

/// Number of charges per source since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeCounters {
    pub door_open: u64,
    pub crossing: u64,
    pub door_hit: u64,
}

impl ChargeCounters {
    pub fn total(&self) -> u64 {
        self.door_open + self.crossing + self.door_hit
    }
}

/// Entropy budget for a population: the system entropy with both
/// chambers at equilibrium, or the geometry-free maximum when that is
/// degenerate.
pub fn demon_budget(config: &SimulationConfig) -> f64 {
    let n = microstate_count(config.width, config.height, config.particle_radius);
    let budget = max_system_entropy(n, config.blue_count, config.red_count);
    if budget > 0.0 && budget.is_finite() {
        budget
    } else {
        maximum_entropy(config.total_particles())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemonLedger {
    accumulated: f64,
    budget: f64,
    cost: f64,
    door_was_open: bool,
    counters: ChargeCounters,
}

impl DemonLedger {
    pub fn new(budget: f64, cost: f64) -> Self {
        Self {
            accumulated: 0.0,
            budget: budget.max(0.0),
            cost,
            door_was_open: false,
            counters: ChargeCounters::default(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(demon_budget(config), config.landauer_cost)
    }

    /// Bill one measurement. Returns the entropy actually added after
    /// clamping to the budget.
    pub fn charge(&mut self, source: ChargeSource) -> f64 {
        match source {
            ChargeSource::DoorOpen => self.counters.door_open += 1,
            ChargeSource::Crossing => self.counters.crossing += 1,
            ChargeSource::DoorHit => self.counters.door_hit += 1,
        }
        let before = self.accumulated;
        self.accumulated = clamp_finite(before + self.cost, 0.0, self.budget);
        self.accumulated - before
    }

    /// Feed the door state observed this tick. Returns the new state on a
    /// transition, `None` otherwise.
    pub fn observe_door(&mut self, open: bool) -> Option<bool> {
        let changed = open != self.door_was_open;
        self.door_was_open = open;
        changed.then_some(open)
    }

    /// Replace the budget, keeping the accumulator within it.
    pub fn set_budget(&mut self, budget: f64) {
        self.budget = budget.max(0.0);
        self.accumulated = clamp_finite(self.accumulated, 0.0, self.budget);
    }

    /// Zero the accumulator, counters, and edge detector under a new budget.
    pub fn reset(&mut self, budget: f64) {
        self.accumulated = 0.0;
        self.budget = budget.max(0.0);
        self.door_was_open = false;
        self.counters = ChargeCounters::default();
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn counters(&self) -> ChargeCounters {
        self.counters
    }
}
