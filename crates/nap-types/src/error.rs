// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all NaP kernel failures.
///
/// None of these are raised on the per-step path: every variant is
/// produced while applying configuration or handling a host lifecycle
/// event, before the real-time loop touches the state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NapError {
    /// Invalid kinetic parameter (zero channel count, zero slope, ...).
    #[error("config error: {0}")]
    Config(String),

    /// A host parameter value that does not parse as its declared kind.
    #[error("parameter {name:?}: cannot parse {value:?}")]
    Parameter { name: &'static str, value: String },

    /// The host holds no value for a registered parameter.
    #[error("parameter {0:?} missing from host")]
    MissingParameter(&'static str),

    /// Numerical degeneracy detected outside the step path.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Reconfiguration or period event received before INIT.
    #[error("integrator not initialised: INIT has not been received")]
    Uninitialized,
}

pub type NapResult<T> = Result<T, NapError>;
