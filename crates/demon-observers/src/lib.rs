// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Observers (Entropy + Thermodynamics)
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Read-only observers of the particle population.
//!
//! - entropy: combinatorial + spatial chamber entropy, Stirling-backed ln(n!)
//! - multiplicity: system entropy vs. slow particles on the left
//! - thermo: kinetic energy and equipartition temperatures per chamber

pub mod entropy;
pub mod multiplicity;
pub mod thermo;

pub use entropy::{
    chamber_entropy, combinatorial_entropy, is_valid_entropy, log_factorial, max_system_entropy,
    maximum_entropy, microstate_count, spatial_entropy, system_entropy, try_log_factorial,
    ChamberOccupancy,
};
pub use multiplicity::{multiplicity_curve, MultiplicityCurve, MultiplicityPoint};
pub use thermo::{energy_ev, temperature, ThermoReading, ThermodynamicsObserver};
