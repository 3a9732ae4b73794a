// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Snapshot and Event Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::config::Chamber;

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_finite: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_finite: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Speed class of a particle. Slow particles render blue, fast ones red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Slow,
    Fast,
}

impl ParticleKind {
    /// Fast iff `speed >= threshold`.
    #[inline]
    pub fn from_speed(speed: f64, threshold: f64) -> Self {
        if speed >= threshold {
            ParticleKind::Fast
        } else {
            ParticleKind::Slow
        }
    }

    /// Chamber the demon wants this kind in, given where slow ones go.
    #[inline]
    pub fn home(self, slow_chamber: Chamber) -> Chamber {
        match self {
            ParticleKind::Slow => slow_chamber,
            ParticleKind::Fast => slow_chamber.opposite(),
        }
    }
}

/// Render-facing view of a single particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// ‖velocity‖ in pixels/tick.
    pub speed: f64,
    /// Heading in radians, `atan2(vy, vx)`.
    pub direction: f64,
    pub radius: f64,
    pub kind: ParticleKind,
}

/// Occupancy by speed class and chamber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamberCounts {
    pub left_slow: usize,
    pub left_fast: usize,
    pub right_slow: usize,
    pub right_fast: usize,
}

impl ChamberCounts {
    pub fn record(&mut self, chamber: Chamber, kind: ParticleKind) {
        match (chamber, kind) {
            (Chamber::Left, ParticleKind::Slow) => self.left_slow += 1,
            (Chamber::Left, ParticleKind::Fast) => self.left_fast += 1,
            (Chamber::Right, ParticleKind::Slow) => self.right_slow += 1,
            (Chamber::Right, ParticleKind::Fast) => self.right_fast += 1,
        }
    }

    pub fn left_total(&self) -> usize {
        self.left_slow + self.left_fast
    }

    pub fn right_total(&self) -> usize {
        self.right_slow + self.right_fast
    }

    pub fn total(&self) -> usize {
        self.left_total() + self.right_total()
    }

    /// `(total, slow)` occupancy of one chamber.
    pub fn occupancy(&self, chamber: Chamber) -> (usize, usize) {
        match chamber {
            Chamber::Left => (self.left_total(), self.left_slow),
            Chamber::Right => (self.right_total(), self.right_slow),
        }
    }
}

/// Scalar read-outs for the display layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermoSummary {
    pub system_entropy: f64,
    pub left_entropy: f64,
    pub right_entropy: f64,
    pub demon_entropy: f64,
    pub demon_budget: f64,
    /// Kelvin, display-scaled.
    pub system_temperature: f64,
    pub left_temperature: f64,
    pub right_temperature: f64,
    /// Joules.
    pub total_energy: f64,
    pub left_energy: f64,
    pub right_energy: f64,
}

impl ThermoSummary {
    /// Fill level of the combined gauge: (S_sys + S_demon) / (2·budget).
    pub fn combined_gauge_fraction(&self) -> f64 {
        if self.demon_budget <= 0.0 {
            return 0.0;
        }
        clamp_finite(
            (self.system_entropy + self.demon_entropy) / (2.0 * self.demon_budget),
            0.0,
            1.0,
        )
    }
}

/// Consistent post-tick view of the whole simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub particles: Vec<ParticleView>,
    pub door_open: bool,
    pub door_top: f64,
    pub door_bottom: f64,
    pub perfect_mode: bool,
    pub counts: ChamberCounts,
    pub summary: ThermoSummary,
}

/// Fire-and-forget notifications for the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// Particles `a < b` overlapped and were resolved.
    Collision { tick: u64, a: usize, b: usize },
    /// A debounced door-area hit was billed.
    DoorHit { tick: u64, particle: usize },
    /// The door changed state.
    DoorTransition { tick: u64, open: bool },
    /// A perfect-mode particle reached its home chamber and was billed.
    CrossingCharged { tick: u64, particle: usize },
}

impl SimulationEvent {
    pub fn tick(&self) -> u64 {
        match *self {
            SimulationEvent::Collision { tick, .. }
            | SimulationEvent::DoorHit { tick, .. }
            | SimulationEvent::DoorTransition { tick, .. }
            | SimulationEvent::CrossingCharged { tick, .. } => tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_finite(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_pos_inf() {
        assert_eq!(clamp_finite(f64::INFINITY, 0.0, 5.0), 5.0);
    }

    #[test]
    fn test_clamp_neg_inf() {
        assert_eq!(clamp_finite(f64::NEG_INFINITY, 0.0, 5.0), 0.0);
    }

    #[test]
    fn test_clamp_normal() {
        assert_eq!(clamp_finite(0.75, 0.0, 1.0), 0.75);
    }

    #[test]
    fn test_kind_threshold_inclusive() {
        assert_eq!(ParticleKind::from_speed(3.5, 3.5), ParticleKind::Fast);
        assert_eq!(ParticleKind::from_speed(3.499, 3.5), ParticleKind::Slow);
    }

    #[test]
    fn test_kind_home() {
        assert_eq!(ParticleKind::Slow.home(Chamber::Left), Chamber::Left);
        assert_eq!(ParticleKind::Fast.home(Chamber::Left), Chamber::Right);
        assert_eq!(ParticleKind::Fast.home(Chamber::Right), Chamber::Left);
    }

    #[test]
    fn test_counts_occupancy() {
        let mut counts = ChamberCounts::default();
        counts.record(Chamber::Left, ParticleKind::Slow);
        counts.record(Chamber::Left, ParticleKind::Fast);
        counts.record(Chamber::Right, ParticleKind::Slow);
        assert_eq!(counts.occupancy(Chamber::Left), (2, 1));
        assert_eq!(counts.occupancy(Chamber::Right), (1, 1));
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_gauge_zero_budget() {
        let summary = ThermoSummary {
            system_entropy: 10.0,
            ..Default::default()
        };
        assert_eq!(summary.combined_gauge_fraction(), 0.0);
    }

    #[test]
    fn test_gauge_half_full_at_start() {
        let summary = ThermoSummary {
            system_entropy: 40.0,
            demon_entropy: 0.0,
            demon_budget: 40.0,
            ..Default::default()
        };
        assert!((summary.combined_gauge_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_event_tick() {
        let event = SimulationEvent::DoorTransition { tick: 7, open: true };
        assert_eq!(event.tick(), 7);
    }
}
