//! Error types for the dataflow engine
//!
//! User callbacks report failures as boxed errors ([`CallbackError`]); the
//! engine wraps them with the chain position and the offending record so a
//! failed run names exactly what broke and on which data.

use thiserror::Error;

use crate::record::{Epoch, Value};

/// Boxed error returned by a user-supplied operator callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// Operator chain errors
    #[error("operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Epoch progress tracking errors
    #[error("frontier error: {0}")]
    Frontier(#[from] FrontierError),

    /// Configuration errors
    #[error("configuration error: {source}")]
    Configuration {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic error for unexpected conditions
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised while applying the operator chain to a record
#[derive(Error, Debug)]
pub enum OperatorError {
    /// A user callback failed on a specific record. Never retried: the
    /// chain may already have performed side effects for this record.
    #[error(
        "callback failed at step {index} ({operator}) on record ({epoch}, {value}): {source}"
    )]
    Callback {
        /// Position of the failing operator in the chain (0-based)
        index: usize,
        /// Name of the failing operator
        operator: String,
        /// Epoch of the offending record
        epoch: Epoch,
        /// Value as received by the failing operator
        value: Value,
        source: CallbackError,
    },
}

/// Errors raised by epoch progress tracking
#[derive(Error, Debug)]
pub enum FrontierError {
    /// The source emitted an epoch behind the frontier, violating the
    /// monotonicity contract progress tracking depends on.
    #[error("epoch regression: source yielded epoch {offending} behind the frontier at {frontier}")]
    EpochRegression { frontier: Epoch, offending: Epoch },
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Result type alias for operator chain operations
pub type OperatorResult<T> = std::result::Result<T, OperatorError>;

/// Result type alias for frontier operations
pub type FrontierResult<T> = std::result::Result<T, FrontierError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Configuration {
            source: Box::new(err),
        }
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Internal(err.to_string())
    }
}
