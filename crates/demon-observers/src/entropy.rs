// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Entropy Model
// ─────────────────────────────────────────────────────────────────────
//! Combinatorial and spatial entropy of a chamber from its occupancy.
//!
//! A chamber is described by the triple `(n, k, b)`:
//!   - n: microstates available (chamber area / particle cross-section)
//!   - k: particles present
//!   - b: particles of one kind present
//!
//! S_chamber = S_spatial(n, k, b) + S_combinatorial(k, b)
//!
//! All functions are total. Degenerate arguments contribute zero entropy
//! instead of failing, and every result is floored at zero.

use serde::{Deserialize, Serialize};

use demon_types::{DemonError, DemonResult};

/// ln(n!) switches from exact summation to Stirling at this n.
pub const STIRLING_THRESHOLD: f64 = 100.0;

/// `Σ ln(i)` for `i = 2..=⌊n⌋`. Linear in n; only reached below
/// `STIRLING_THRESHOLD`.
fn log_factorial_exact(n: f64) -> f64 {
    if n.is_nan() || n < 2.0 {
        return 0.0;
    }
    let upper = n.floor() as u64;
    (2..=upper).map(|i| (i as f64).ln()).sum()
}

/// Stirling: `n·ln(n) − n + 0.5·ln(2πn)`.
pub fn log_factorial_stirling(n: f64) -> f64 {
    if n.is_nan() || n <= 0.0 {
        return 0.0;
    }
    n * n.ln() - n + 0.5 * (std::f64::consts::TAU * n).ln()
}

/// ln(n!), failing on negative or NaN input.
pub fn try_log_factorial(n: f64) -> DemonResult<f64> {
    if n.is_nan() {
        return Err(DemonError::InvalidInput("log_factorial of NaN".to_string()));
    }
    if n < 0.0 {
        return Err(DemonError::InvalidInput(format!(
            "log_factorial of negative value {n}"
        )));
    }
    if n < 2.0 {
        return Ok(0.0);
    }
    if n < STIRLING_THRESHOLD {
        Ok(log_factorial_exact(n))
    } else {
        Ok(log_factorial_stirling(n))
    }
}

/// ln(n!). Invalid input is logged and yields 0.
pub fn log_factorial(n: f64) -> f64 {
    try_log_factorial(n).unwrap_or_else(|e| {
        log::warn!("{e}, returning 0");
        0.0
    })
}

/// Colour-mixing entropy `ln(k! / (b!·(k−b)!))`.
pub fn combinatorial_entropy(k: f64, b: f64) -> f64 {
    if k.is_nan() || b.is_nan() {
        log::warn!("combinatorial_entropy: invalid input (k={k}, b={b})");
        return 0.0;
    }
    if k <= 0.0 {
        return 0.0;
    }
    let b = b.clamp(0.0, k);
    let entropy = log_factorial(k) - log_factorial(b) - log_factorial(k - b);
    entropy.max(0.0)
}

/// Placement entropy
/// `n·ln(n/(n−k)) + k·ln((n−k)/(k−b)) + b·ln((k−b)/b)`.
///
/// Zero when `n = 0`, `k = 0`, `k = n`, `k = b`, or `b = 0`.
pub fn spatial_entropy(n: f64, k: f64, b: f64) -> f64 {
    if n.is_nan() || k.is_nan() || b.is_nan() {
        log::warn!("spatial_entropy: invalid input (n={n}, k={k}, b={b})");
        return 0.0;
    }
    if n <= 0.0 || k <= 0.0 {
        return 0.0;
    }
    let k = k.min(n);
    let b = b.clamp(0.0, k);
    if n - k <= 0.0 || k - b <= 0.0 || b <= 0.0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    entropy += n * (n / (n - k)).ln();
    entropy += k * ((n - k) / (k - b)).ln();
    entropy += b * ((k - b) / b).ln();
    entropy.max(0.0)
}

/// Spatial plus combinatorial entropy of one chamber.
pub fn chamber_entropy(n: f64, k: f64, b: f64) -> f64 {
    spatial_entropy(n, k, b) + combinatorial_entropy(k, b)
}

/// Occupancy of one chamber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChamberOccupancy {
    /// Available microstates.
    pub n: f64,
    /// Particles present.
    pub k: f64,
    /// Particles of the counted kind present.
    pub b: f64,
}

impl ChamberOccupancy {
    pub fn new(n: f64, k: usize, b: usize) -> Self {
        Self {
            n,
            k: k as f64,
            b: b as f64,
        }
    }

    pub fn entropy(&self) -> f64 {
        chamber_entropy(self.n, self.k, self.b)
    }
}

/// Sum of both chamber entropies.
pub fn system_entropy(left: &ChamberOccupancy, right: &ChamberOccupancy) -> f64 {
    left.entropy() + right.entropy()
}

/// Geometry-free entropy scale for `k` particles: the evenly split
/// combinatorial term plus `k·ln(k)`.
pub fn maximum_entropy(k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let k_f = k as f64;
    combinatorial_entropy(k_f, (k / 2) as f64) + k_f * k_f.ln()
}

/// System entropy at equilibrium: both chambers hold half of each kind.
pub fn max_system_entropy(n: f64, blue: usize, red: usize) -> f64 {
    let total = blue + red;
    if total == 0 {
        return 0.0;
    }
    2.0 * chamber_entropy(n, total as f64 / 2.0, blue as f64 / 2.0)
}

/// Non-overlapping placements in one chamber: `(width/2)·height / (π·r²)`.
pub fn microstate_count(width: f64, height: f64, radius: f64) -> f64 {
    let cross_section = std::f64::consts::PI * radius * radius;
    if cross_section.is_nan() || cross_section <= 0.0 {
        return 0.0;
    }
    ((0.5 * width * height) / cross_section).max(0.0)
}

/// Finite, non-negative, and within the empirical `3·k·ln(k)` bound.
pub fn is_valid_entropy(entropy: f64, k: usize) -> bool {
    if !entropy.is_finite() || entropy < 0.0 {
        return false;
    }
    if k == 0 {
        return true;
    }
    let k_f = k as f64;
    entropy <= 3.0 * k_f * k_f.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_factorial_small() {
        assert_eq!(log_factorial(0.0), 0.0);
        assert_eq!(log_factorial(1.0), 0.0);
        assert!((log_factorial(5.0) - 120f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_factorial_negative_is_zero() {
        assert_eq!(log_factorial(-3.0), 0.0);
        assert!(matches!(
            try_log_factorial(-3.0),
            Err(DemonError::InvalidInput(_))
        ));
        assert!(try_log_factorial(f64::NAN).is_err());
    }

    #[test]
    fn test_log_factorial_branches_agree_at_threshold() {
        let exact = log_factorial_exact(100.0);
        let stirling = log_factorial_stirling(100.0);
        assert!(
            ((exact - stirling) / exact).abs() < 0.01,
            "exact={exact} stirling={stirling}"
        );
        // Both sides of the switch are continuous.
        let below = log_factorial(99.0);
        let at = log_factorial(100.0);
        assert!(((at - below) - 100f64.ln()).abs() / at < 0.01);
    }

    #[test]
    fn test_log_factorial_uses_stirling_above_threshold() {
        assert_eq!(log_factorial(250.0), log_factorial_stirling(250.0));
        assert_eq!(log_factorial(50.0), log_factorial_exact(50.0));
    }

    #[test]
    fn test_log_factorial_huge_input_is_closed_form() {
        assert_eq!(log_factorial(1e15), log_factorial_stirling(1e15));
        assert_eq!(try_log_factorial(1e15).unwrap(), log_factorial_stirling(1e15));
    }

    #[test]
    fn test_combinatorial_binomial() {
        // C(10, 5) = 252
        assert!((combinatorial_entropy(10.0, 5.0) - 252f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_combinatorial_edges() {
        assert_eq!(combinatorial_entropy(0.0, 0.0), 0.0);
        assert_eq!(combinatorial_entropy(10.0, 0.0), 0.0);
        assert_eq!(combinatorial_entropy(10.0, 10.0), 0.0);
        // b clamped into [0, k]
        assert_eq!(combinatorial_entropy(10.0, 15.0), 0.0);
        assert_eq!(combinatorial_entropy(10.0, -4.0), 0.0);
        assert_eq!(combinatorial_entropy(f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn test_spatial_degenerate_ratios_are_zero() {
        assert_eq!(spatial_entropy(0.0, 5.0, 2.0), 0.0);
        assert_eq!(spatial_entropy(100.0, 0.0, 0.0), 0.0);
        assert_eq!(spatial_entropy(100.0, 100.0, 50.0), 0.0);
        assert_eq!(spatial_entropy(100.0, 10.0, 10.0), 0.0);
        assert_eq!(spatial_entropy(100.0, 10.0, 0.0), 0.0);
        assert_eq!(spatial_entropy(f64::NAN, 10.0, 3.0), 0.0);
    }

    #[test]
    fn test_spatial_formula() {
        let (n, k, b) = (100.0f64, 10.0f64, 4.0f64);
        let expected =
            n * (n / (n - k)).ln() + k * ((n - k) / (k - b)).ln() + b * ((k - b) / b).ln();
        assert!((spatial_entropy(n, k, b) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_chamber_entropy_non_negative_grid() {
        for n in [1.0, 5.0, 20.0, 763.9] {
            for k in 0..=20usize {
                for b in 0..=k {
                    let k_f = (k as f64).min(n);
                    let s = chamber_entropy(n, k_f, (b as f64).min(k_f));
                    assert!(s >= 0.0, "S({n},{k},{b}) = {s}");
                }
            }
        }
    }

    #[test]
    fn test_chamber_entropy_peaks_at_half() {
        let (n, k) = (763.9, 20.0);
        let (best_b, _) = (0..=20)
            .map(|b| (b, chamber_entropy(n, k, b as f64)))
            .fold((0, f64::MIN), |acc, (b, s)| if s > acc.1 { (b, s) } else { acc });
        assert!((best_b as i64 - 10).abs() <= 1, "argmax b = {best_b}");
    }

    #[test]
    fn test_system_entropy_sums_chambers() {
        let left = ChamberOccupancy::new(500.0, 8, 3);
        let right = ChamberOccupancy::new(500.0, 12, 7);
        let expected = chamber_entropy(500.0, 8.0, 3.0) + chamber_entropy(500.0, 12.0, 7.0);
        assert!((system_entropy(&left, &right) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_maximum_entropy() {
        assert_eq!(maximum_entropy(0), 0.0);
        let expected = combinatorial_entropy(20.0, 10.0) + 20.0 * 20f64.ln();
        assert!((maximum_entropy(20) - expected).abs() < 1e-12);
        // Odd k uses the floor split.
        let expected = combinatorial_entropy(7.0, 3.0) + 7.0 * 7f64.ln();
        assert!((maximum_entropy(7) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_max_system_entropy_doubles_equilibrium_chamber() {
        let n = microstate_count(800.0, 600.0, 10.0);
        let expected = 2.0 * chamber_entropy(n, 10.0, 5.0);
        assert!((max_system_entropy(n, 10, 10) - expected).abs() < 1e-12);
        assert_eq!(max_system_entropy(n, 0, 0), 0.0);
    }

    #[test]
    fn test_microstate_count() {
        let n = microstate_count(800.0, 600.0, 10.0);
        assert!((n - 240_000.0 / (std::f64::consts::PI * 100.0)).abs() < 1e-9);
        assert_eq!(microstate_count(800.0, 600.0, 0.0), 0.0);
    }

    #[test]
    fn test_is_valid_entropy() {
        assert!(is_valid_entropy(10.0, 20));
        assert!(!is_valid_entropy(-1.0, 20));
        assert!(!is_valid_entropy(f64::NAN, 20));
        assert!(!is_valid_entropy(1e6, 20));
        assert!(is_valid_entropy(0.0, 0));
    }
}
