//! # Error Types
//!
//! Structured error types for iavs_core. The sizing engine itself is total:
//! degenerate dimensions collapse to zero or to a neutral risk band instead of
//! failing. Errors only appear at the edges, when a front end validates raw
//! user input or when the summary report cannot be rendered.
//!
//! ## Example
//!
//! ```rust
//! use iavs_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_mm: f64) -> CalcResult<()> {
//!     if length_mm < 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length",
//!             length_mm.to_string(),
//!             "Length cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for iavs_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (negative, not a number, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Unit symbol not recognised
    #[error("Unknown unit: '{symbol}' (expected m, cm, in or ft)")]
    UnknownUnit { symbol: String },

    /// The summary report could not be produced
    #[error("Report rendering failed: {stage} - {reason}")]
    RenderFailed { stage: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(symbol: impl Into<String>) -> Self {
        CalcError::UnknownUnit {
            symbol: symbol.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::RenderFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// A failed report leaves the calculation untouched, so the user can
    /// simply try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::RenderFailed { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::RenderFailed { .. } => "RENDER_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
