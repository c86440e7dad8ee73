//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be a finite, non-negative number, got {actual}")]
    NotNonNegative { field: String, actual: f64 },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a negative or non-finite number validation error.
    pub fn not_non_negative(field: impl Into<String>, actual: f64) -> Self {
        ValidationError::NotNonNegative {
            field: field.into(),
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Checks that a monetary or rate value is finite and `>= 0`.
    pub fn check_non_negative(field: &str, value: f64) -> Result<f64, ValidationError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::not_non_negative(field, value))
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    BidNotFound,
    MarketNotFound,

    // State errors
    InvalidStateTransition,
    BidAlreadyPriced,
    BidNotApproved,

    // Consistency errors
    InconsistentConfiguration,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::BidNotFound => "BID_NOT_FOUND",
            ErrorCode::MarketNotFound => "MARKET_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::BidAlreadyPriced => "BID_ALREADY_PRICED",
            ErrorCode::BidNotApproved => "BID_NOT_APPROVED",
            ErrorCode::InconsistentConfiguration => "INCONSISTENT_CONFIGURATION",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns true if the error carries the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::NotNonNegative { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        DomainError::validation(field, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("market");
        assert_eq!(format!("{}", err), "Field 'market' cannot be empty");
    }

    #[test]
    fn check_non_negative_accepts_zero_and_rejects_nan() {
        assert_eq!(ValidationError::check_non_negative("amount", 0.0), Ok(0.0));
        assert!(ValidationError::check_non_negative("amount", -1.0).is_err());
        assert!(ValidationError::check_non_negative("amount", f64::NAN).is_err());
        assert!(ValidationError::check_non_negative("amount", f64::INFINITY).is_err());
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::BidNotFound, "Bid not found");
        assert_eq!(format!("{}", err), "[BID_NOT_FOUND] Bid not found");
    }

    #[test]
    fn not_found_codes_display_as_upper_snake_case() {
        assert_eq!(ErrorCode::BidNotFound.to_string(), "BID_NOT_FOUND");
        assert_eq!(ErrorCode::MarketNotFound.to_string(), "MARKET_NOT_FOUND");
        assert_eq!(
            ErrorCode::InconsistentConfiguration.to_string(),
            "INCONSISTENT_CONFIGURATION"
        );
    }

    #[test]
    fn validation_error_converts_with_field_detail() {
        let err: DomainError = ValidationError::not_non_negative("amount", -5.0).into();
        assert!(err.is(ErrorCode::ValidationFailed));
        assert_eq!(err.details.get("field"), Some(&"amount".to_string()));
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::InconsistentConfiguration, "Unknown market")
            .with_detail("market", "Night City");
        assert_eq!(err.details.get("market"), Some(&"Night City".to_string()));
    }
}
