//! Errors raised by the metrics engine at its input boundary.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl EngineError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Rejects NaN, infinities and values below zero.
pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, format!("{value} is not a finite amount")));
    }
    if value < 0.0 {
        return Err(EngineError::invalid(field, format!("{value} must not be negative")));
    }
    Ok(value)
}

/// Rejects NaN, infinities, zero and negative values.
pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, format!("{value} is not a finite amount")));
    }
    if value <= 0.0 {
        return Err(EngineError::invalid(field, format!("{value} must be greater than zero")));
    }
    Ok(value)
}

pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_rejects_zero_and_nan() {
        assert!(positive("goal", 0.0).is_err());
        assert!(positive("goal", -3.0).is_err());
        assert!(positive("goal", f64::NAN).is_err());
        assert_eq!(positive("goal", 2.5), Ok(2.5));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = non_empty("bank", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid bank: must not be empty");
    }
}
