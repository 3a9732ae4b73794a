// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Multiplicity Curve
// ─────────────────────────────────────────────────────────────────────
//! System entropy as a function of how many slow particles sit in the
//! left chamber.
//!
//! For each `slow_left ∈ 0..=total_slow` the left chamber is assumed to
//! hold half the population (rounded up); the remaining left slots go to
//! fast particles, capped at the number available. The curve peaks at the
//! well-mixed split and falls toward the sorted extremes.

use serde::{Deserialize, Serialize};

use crate::entropy::chamber_entropy;

/// One point on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplicityPoint {
    pub slow_left: usize,
    pub fast_left: usize,
    pub entropy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiplicityCurve {
    pub points: Vec<MultiplicityPoint>,
    /// Slow particles currently in the left chamber.
    pub current_slow_left: usize,
    /// Entropy at the current point, 0 when it lies off the curve.
    pub current_entropy: f64,
    /// Index of the current point, 0 when it lies off the curve.
    pub current_index: usize,
}

impl MultiplicityCurve {
    /// Point of maximum entropy. Ties resolve to the lowest index.
    pub fn peak(&self) -> Option<&MultiplicityPoint> {
        self.points.iter().fold(None, |best, p| match best {
            Some(b) if b.entropy >= p.entropy => Some(b),
            _ => Some(p),
        })
    }
}

/// Build the curve for `n` microstates per chamber and mark
/// `current_slow_left` on it.
pub fn multiplicity_curve(
    n: f64,
    total_slow: usize,
    total_fast: usize,
    current_slow_left: usize,
) -> MultiplicityCurve {
    let left_total = (total_slow + total_fast).div_ceil(2);

    let points: Vec<MultiplicityPoint> = (0..=total_slow)
        .map(|slow_left| {
            let fast_left = left_total.saturating_sub(slow_left).min(total_fast);
            let slow_right = total_slow - slow_left;
            let fast_right = total_fast - fast_left;

            let left = chamber_entropy(n, (slow_left + fast_left) as f64, slow_left as f64);
            let right = chamber_entropy(n, (slow_right + fast_right) as f64, slow_right as f64);
            MultiplicityPoint {
                slow_left,
                fast_left,
                entropy: left + right,
            }
        })
        .collect();

    let (current_index, current_entropy) = points
        .iter()
        .position(|p| p.slow_left == current_slow_left)
        .map(|i| (i, points[i].entropy))
        .unwrap_or((0, 0.0));

    MultiplicityCurve {
        points,
        current_slow_left,
        current_entropy,
        current_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::microstate_count;

    #[test]
    fn test_curve_has_one_point_per_split() {
        let curve = multiplicity_curve(500.0, 10, 5, 3);
        assert_eq!(curve.points.len(), 11);
        assert_eq!(curve.points[0].slow_left, 0);
        assert_eq!(curve.points[10].slow_left, 10);
    }

    #[test]
    fn test_fast_left_fills_half_and_is_capped() {
        // 15 particles: left holds 8.
        let curve = multiplicity_curve(500.0, 10, 5, 0);
        assert_eq!(curve.points[0].fast_left, 5);
        assert_eq!(curve.points[3].fast_left, 5);
        assert_eq!(curve.points[4].fast_left, 4);
        assert_eq!(curve.points[8].fast_left, 0);
        assert_eq!(curve.points[10].fast_left, 0);
    }

    #[test]
    fn test_current_marker_on_curve() {
        let curve = multiplicity_curve(500.0, 10, 10, 4);
        assert_eq!(curve.current_index, 4);
        assert_eq!(curve.current_entropy, curve.points[4].entropy);
    }

    #[test]
    fn test_current_marker_off_curve_falls_back() {
        let curve = multiplicity_curve(500.0, 10, 10, 42);
        assert_eq!(curve.current_slow_left, 42);
        assert_eq!(curve.current_index, 0);
        assert_eq!(curve.current_entropy, 0.0);
    }

    #[test]
    fn test_peak_at_even_split() {
        let n = microstate_count(800.0, 600.0, 10.0);
        let curve = multiplicity_curve(n, 10, 10, 0);
        let peak = curve.peak().unwrap();
        assert_eq!(peak.slow_left, 5);
        assert!(curve.points[0].entropy < peak.entropy);
        assert!(curve.points[10].entropy < peak.entropy);
    }

    #[test]
    fn test_empty_population() {
        let curve = multiplicity_curve(500.0, 0, 0, 0);
        assert_eq!(curve.points.len(), 1);
        assert_eq!(curve.points[0].entropy, 0.0);
        assert_eq!(curve.current_entropy, 0.0);
    }
}
