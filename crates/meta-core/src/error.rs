//! Error types for meta-analysis
//!
//! Provides a unified error type for all meta-stats crates. Numeric
//! degeneracies (division by zero, single-study groups) are not errors;
//! they surface as NaN or infinity and are cleaned by the stages that
//! own them. Errors are reserved for structural problems.

use thiserror::Error;

use crate::GroupKey;

/// Core error type for meta-analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// A row references a group that the joined table does not contain
    #[error("Missing group: {0} has no row in the {1} table")]
    MissingGroup(GroupKey, &'static str),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a key width that does not match the table
    pub fn key_width_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Key width mismatch in {context}: expected {expected} key columns, got {actual}"
        ))
    }

    /// Create an error for a confidence level outside (0, 1)
    pub fn invalid_confidence_level(level: f64) -> Self {
        Self::InvalidParameter(format!("Confidence level {level} must be in (0, 1)"))
    }
}
