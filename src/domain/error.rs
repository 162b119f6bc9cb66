//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations on a case.
/// These are independent of persistence and CLI concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("{collection}: description must not be empty")]
    EmptyDescription { collection: &'static str },

    #[error("{collection}: index {index} out of range (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    #[error("projection horizon must be between 1 and 20 years, got {0}")]
    InvalidHorizon(i64),

    #[error("percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(f64),
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Reject NaN and infinities; the JSON case document cannot represent them.
pub fn require_finite(field: &str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::invalid_input(
            field,
            format!("must be a finite number, got {value}"),
        ))
    }
}
