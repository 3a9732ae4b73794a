// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for the kernel's fallible boundaries.
///
/// The tick path itself never fails: degeneracies are absorbed by
/// zero-fallbacks and clamping. These variants surface only where a
/// caller asked for strict behaviour (config validation, explicit
/// populations, `try_*` numerics).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemonError {
    /// Argument outside the domain of a numerical routine.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// An explicitly supplied particle population is unusable.
    #[error("population error: {0}")]
    Population(String),
}

pub type DemonResult<T> = Result<T, DemonError>;
