//! Run-level error types.
//!
//! Per-module fetch failures and per-check faults are *not* errors at this
//! level; they are encoded in [`crate::state::FetchStatus`] and
//! [`crate::report::CheckOutcome`] respectively. `ValidateError` covers only
//! the fatal cases that reject a run before any fetch happens, plus report
//! rendering failures.

use lsrd_types::ParseError;
use thiserror::Error;

/// Result type alias for validator operations.
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Errors that reject a validation run outright.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The requested area identifier is not valid.
    #[error("invalid area: {0}")]
    InvalidArea(#[from] ParseError),

    /// The supplied options failed boundary validation.
    #[error("invalid options: {message}")]
    InvalidOptions {
        /// What was wrong.
        message: String,
    },

    /// Serializing the structured report failed.
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl ValidateError {
    /// Creates an invalid-options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_options_display() {
        let err = ValidateError::invalid_options("timeout must be non-zero");
        assert_eq!(
            err.to_string(),
            "invalid options: timeout must be non-zero"
        );
    }

    #[test]
    fn test_invalid_area_from_parse_error() {
        let err: ValidateError = ParseError::InvalidArea("area 0".to_string()).into();
        assert!(err.to_string().contains("invalid area"));
    }
}
