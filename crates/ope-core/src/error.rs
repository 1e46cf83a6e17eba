//! Error types for offline policy evaluation.
//!
//! Three classes, all surfaced immediately and never retried:
//! validation errors (shapes, ranges, types), configuration errors
//! (malformed reward estimators), and data-insufficiency errors
//! (no usable samples after filtering). Estimators never return NaN
//! or zero in place of an error.

use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("{what} has length {got}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("reward at row {row} is {value}; rewards must be 0 or 1")]
    InvalidReward { row: usize, value: f64 },

    #[error("action {action} at row {row} is out of range for {nchoices} arms")]
    InvalidAction {
        row: usize,
        action: usize,
        nchoices: usize,
    },

    #[error("propensity at row {row} must be positive, got {value}")]
    InvalidPropensity { row: usize, value: f64 },

    #[error("online start point {start} is out of range for {n} samples")]
    StartPointOutOfRange { start: usize, n: usize },

    #[error("batch size {batch_size} must be nonzero and smaller than the sample count {n}")]
    InvalidBatchSize { batch_size: usize, n: usize },

    #[error("full-label matrix must have at least one arm column")]
    NoArms,

    #[error("invalid reward estimator: {0}")]
    InvalidRewardEstimator(String),

    #[error("no logged observations provided")]
    NoData,

    #[error("rejection sampling obtained no matching samples")]
    NoMatchingSamples,

    #[error("kept importance weights sum to zero")]
    ZeroImportanceMass,

    #[error("no importance ratios at or below the cap {cmax}")]
    NoSamplesBelowCap { cmax: f64 },
}
