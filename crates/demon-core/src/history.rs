// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Rolling Entropy / Temperature History
// ─────────────────────────────────────────────────────────────────────
//! Bounded series for charting.
//!
//! A point is appended only when one of its values moved by more than the
//! series tolerance since the last appended point, so a quiet box does
//! not flood the chart. Each series keeps at most `capacity` points.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use demon_types::ThermoSummary;

/// Minimum change in either entropy value that records a new point.
pub const ENTROPY_TOLERANCE: f64 = 0.001;
/// Minimum change in either chamber temperature that records a new point.
pub const TEMPERATURE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyPoint {
    /// Position in the series, counting every point ever appended.
    pub step: u64,
    pub tick: u64,
    pub system: f64,
    pub demon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    pub step: u64,
    pub tick: u64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    entropy: VecDeque<EntropyPoint>,
    temperature: VecDeque<TemperaturePoint>,
    last_entropy: (f64, f64),
    last_temperature: (f64, f64),
    entropy_steps: u64,
    temperature_steps: u64,
}

fn push_bounded<T>(series: &mut VecDeque<T>, capacity: usize, item: T) {
    while series.len() >= capacity {
        series.pop_front();
    }
    series.push_back(item);
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entropy: VecDeque::with_capacity(capacity),
            temperature: VecDeque::with_capacity(capacity),
            last_entropy: (0.0, 0.0),
            last_temperature: (0.0, 0.0),
            entropy_steps: 0,
            temperature_steps: 0,
        }
    }

    /// Offer the post-tick summary to both series. Returns which of
    /// (entropy, temperature) recorded a point.
    pub fn record(&mut self, tick: u64, summary: &ThermoSummary) -> (bool, bool) {
        let (system, demon) = (summary.system_entropy, summary.demon_entropy);
        let entropy_moved = (system - self.last_entropy.0).abs() > ENTROPY_TOLERANCE
            || (demon - self.last_entropy.1).abs() > ENTROPY_TOLERANCE;
        if entropy_moved {
            self.last_entropy = (system, demon);
            self.entropy_steps += 1;
            push_bounded(
                &mut self.entropy,
                self.capacity,
                EntropyPoint {
                    step: self.entropy_steps,
                    tick,
                    system,
                    demon,
                },
            );
        }

        let (left, right) = (summary.left_temperature, summary.right_temperature);
        let temperature_moved = (left - self.last_temperature.0).abs() > TEMPERATURE_TOLERANCE
            || (right - self.last_temperature.1).abs() > TEMPERATURE_TOLERANCE;
        if temperature_moved {
            self.last_temperature = (left, right);
            self.temperature_steps += 1;
            push_bounded(
                &mut self.temperature,
                self.capacity,
                TemperaturePoint {
                    step: self.temperature_steps,
                    tick,
                    left,
                    right,
                },
            );
        }

        (entropy_moved, temperature_moved)
    }

    pub fn entropy(&self) -> impl ExactSizeIterator<Item = &EntropyPoint> {
        self.entropy.iter()
    }

    pub fn temperature(&self) -> impl ExactSizeIterator<Item = &TemperaturePoint> {
        self.temperature.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every point and forget the last recorded values.
    pub fn clear(&mut self) {
        self.entropy.clear();
        self.temperature.clear();
        self.last_entropy = (0.0, 0.0);
        self.last_temperature = (0.0, 0.0);
        self.entropy_steps = 0;
        self.temperature_steps = 0;
    }
}
