//! # Error Types
//!
//! Every failure in power_core is a [`DomainError`]: the inputs describe a
//! study for which no finite sample size exists. Errors are raised before any
//! result is produced and carry enough context (field name, offending value)
//! for a caller to turn them into a validation message.
//!
//! ## Example
//!
//! ```rust
//! use power_core::errors::{CalcResult, DomainError};
//!
//! fn validate_sd(pooled_sd: f64) -> CalcResult<()> {
//!     if pooled_sd <= 0.0 {
//!         return Err(DomainError::non_positive("pooled_sd", pooled_sd));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_sd(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for power_core operations
pub type CalcResult<T> = Result<T, DomainError>;

/// Structured domain error.
///
/// All variants are the same kind of failure (the inputs lie outside the
/// domain of the formulas); the variant only says which rule was broken.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DomainError {
    /// A value that divides or scales the result must be strictly positive
    #[error("Invalid input for '{field}': {value} - must be strictly positive")]
    NonPositive { field: String, value: f64 },

    /// A probability must lie strictly between 0 and 1
    #[error("Invalid input for '{field}': {value} - must lie strictly between 0 and 1")]
    ProbabilityOutOfRange { field: String, value: f64 },

    /// NaN or infinite input
    #[error("Invalid input for '{field}': value is not finite")]
    NotFinite { field: String },

    /// Study design identifier that is neither parallel nor paired
    #[error("Unsupported study design: '{name}' (expected 'parallel' or 'paired')")]
    UnsupportedDesign { name: String },

    /// The required sample size does not fit in an integer count
    #[error("Required sample size is unbounded: {reason}")]
    Unbounded { reason: String },
}

impl DomainError {
    /// Create a NonPositive error
    pub fn non_positive(field: impl Into<String>, value: f64) -> Self {
        DomainError::NonPositive {
            field: field.into(),
            value,
        }
    }

    /// Create a ProbabilityOutOfRange error
    pub fn probability_out_of_range(field: impl Into<String>, value: f64) -> Self {
        DomainError::ProbabilityOutOfRange {
            field: field.into(),
            value,
        }
    }

    /// Create a NotFinite error
    pub fn not_finite(field: impl Into<String>) -> Self {
        DomainError::NotFinite {
            field: field.into(),
        }
    }

    /// Create an UnsupportedDesign error
    pub fn unsupported_design(name: impl Into<String>) -> Self {
        DomainError::UnsupportedDesign { name: name.into() }
    }

    /// Create an Unbounded error
    pub fn unbounded(reason: impl Into<String>) -> Self {
        DomainError::Unbounded {
            reason: reason.into(),
        }
    }

    /// Name of the input that caused the error, if one is attributable
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::NonPositive { field, .. }
            | DomainError::ProbabilityOutOfRange { field, .. }
            | DomainError::NotFinite { field } => Some(field),
            DomainError::UnsupportedDesign { .. } => Some("study_type"),
            DomainError::Unbounded { .. } => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::NonPositive { .. } => "NON_POSITIVE",
            DomainError::ProbabilityOutOfRange { .. } => "PROBABILITY_OUT_OF_RANGE",
            DomainError::NotFinite { .. } => "NOT_FINITE",
            DomainError::UnsupportedDesign { .. } => "UNSUPPORTED_DESIGN",
            DomainError::Unbounded { .. } => "UNBOUNDED",
        }
    }
}

/// Reject NaN and infinities.
pub(crate) fn require_finite(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::not_finite(field))
    }
}

/// Require a finite value strictly greater than zero.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<f64> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(DomainError::non_positive(field, value));
    }
    Ok(value)
}

/// Require a finite probability in the open interval (0, 1).
pub(crate) fn require_probability(field: &str, value: f64) -> CalcResult<f64> {
    require_finite(field, value)?;
    if value <= 0.0 || value >= 1.0 {
        return Err(DomainError::probability_out_of_range(field, value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DomainError::non_positive("effect_size", 0.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("NonPositive"));
        let roundtrip: DomainError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::not_finite("alpha").error_code(), "NOT_FINITE");
        assert_eq!(
            DomainError::unsupported_design("crossover").error_code(),
            "UNSUPPORTED_DESIGN"
        );
    }

    #[test]
    fn test_error_field() {
        assert_eq!(
            DomainError::probability_out_of_range("power", 1.0).field(),
            Some("power")
        );
        assert_eq!(DomainError::unsupported_design("x").field(), Some("study_type"));
        assert_eq!(DomainError::unbounded("overflow").field(), None);
    }

    #[test]
    fn test_error_message() {
        let error = DomainError::unsupported_design("crossover");
        assert_eq!(
            error.to_string(),
            "Unsupported study design: 'crossover' (expected 'parallel' or 'paired')"
        );
    }

    #[test]
    fn test_validators() {
        assert_eq!(require_positive("x", 2.0), Ok(2.0));
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", -1.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_probability("p", 0.0).is_err());
        assert!(require_probability("p", 1.0).is_err());
        assert_eq!(require_probability("p", 0.5), Ok(0.5));
        assert!(require_finite("m", f64::INFINITY).is_err());
    }
}
