// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Tick-driven simulation of a two-chamber box sorted by a demon, with
//! the demon's Landauer cost kept on a bounded ledger.
//!
//! # Invariants
//!
//! 1. **Ledger is bounded**: demon entropy stays in `[0, budget]` after
//!    every charge, budget change, and reset.
//!
//! 2. **Particle type is derived**: slow/fast is recomputed from the
//!    current velocity wherever it is needed and never stored.
//!
//! 3. **Reconfiguration is atomic**: population, partition, ledger, and
//!    history are rebuilt together before the next tick.
//!
//! 4. **A closed door never charges**: in normal mode the demon only pays
//!    for opening the door and for hits it measures while it is open.

pub mod clock;
pub mod events;
pub mod history;
pub mod ledger;
pub mod partition;

pub use clock::{SimulationClock, SimulationState, TickReport};
pub use events::{CallbackSink, EventSink, RecordingSink};
pub use history::{EntropyPoint, History, TemperaturePoint};
pub use ledger::{demon_budget, ChargeCounters, ChargeSource, DemonLedger};
pub use partition::{ChamberPartition, Crossing};
