// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Maxwell's Demon kernel: the two-chamber sorting simulation and its
//! Landauer entropy bookkeeping.

pub mod config;
pub mod error;
pub mod snapshot;

pub use config::{Chamber, SimulationConfig};
pub use error::{DemonError, DemonResult};
pub use snapshot::{
    clamp_finite, ChamberCounts, ParticleKind, ParticleView, SimulationEvent, Snapshot,
    ThermoSummary,
};
