// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Physical Constants
// ─────────────────────────────────────────────────────────────────────
//! Unit conversions between simulation space (pixels, ticks, radius
//! units) and SI, plus the type-biased initial speed bands.

use demon_types::ParticleKind;

/// Mass per unit radius. Mass is always derived, never set.
pub const MASS_PER_RADIUS: f64 = 0.1;

/// Pixels/tick → m/s.
pub const SPEED_SCALE: f64 = 0.01;

/// Simulation mass units → kg.
pub const MASS_SCALE: f64 = 1e-24;

/// Boltzmann constant (J/K).
pub const K_B: f64 = 1.380649e-23;

/// Display scale applied to equipartition temperatures.
pub const TEMPERATURE_DISPLAY_SCALE: f64 = 1e7;

/// Joules → electron-volts.
pub const J_TO_EV: f64 = 6.242e18;

/// Display scale applied to energies reported in eV.
pub const ENERGY_DISPLAY_SCALE: f64 = 1e8;

/// Gap kept between a biased speed band and the classification threshold.
pub const SPEED_BAND_GAP: f64 = 0.1;

/// Initial speed band `[lo, hi]` for a requested particle kind.
///
/// Slow particles sample below the threshold, fast ones above it; when the
/// threshold lies outside `[min_speed, max_speed]` the full range is used.
pub fn initial_speed_range(
    kind: ParticleKind,
    threshold: f64,
    min_speed: f64,
    max_speed: f64,
) -> (f64, f64) {
    match kind {
        ParticleKind::Slow if threshold > min_speed => (
            min_speed,
            (min_speed + SPEED_BAND_GAP).max(threshold - SPEED_BAND_GAP),
        ),
        ParticleKind::Fast if threshold < max_speed => (
            (max_speed - SPEED_BAND_GAP).min(threshold + SPEED_BAND_GAP),
            max_speed,
        ),
        _ => (min_speed, max_speed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_band_below_threshold() {
        let (lo, hi) = initial_speed_range(ParticleKind::Slow, 3.5, 2.0, 5.0);
        assert_eq!(lo, 2.0);
        assert!((hi - 3.4).abs() < 1e-12);
    }

    #[test]
    fn test_fast_band_above_threshold() {
        let (lo, hi) = initial_speed_range(ParticleKind::Fast, 3.5, 2.0, 5.0);
        assert!((lo - 3.6).abs() < 1e-12);
        assert_eq!(hi, 5.0);
    }

    #[test]
    fn test_slow_band_threshold_below_min() {
        assert_eq!(
            initial_speed_range(ParticleKind::Slow, 1.0, 2.0, 5.0),
            (2.0, 5.0)
        );
    }

    #[test]
    fn test_fast_band_threshold_above_max() {
        assert_eq!(
            initial_speed_range(ParticleKind::Fast, 6.0, 2.0, 5.0),
            (2.0, 5.0)
        );
    }

    #[test]
    fn test_slow_band_never_empty() {
        let (lo, hi) = initial_speed_range(ParticleKind::Slow, 2.05, 2.0, 5.0);
        assert!(hi > lo);
    }
}
