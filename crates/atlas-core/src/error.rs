//! # Error Types
//!
//! Domain-specific error types for atlas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  atlas-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form / input validation failures               │
//! │                                                                         │
//! │  atlas-client errors (separate crate)                                  │
//! │  └── ClientError      - Network, storage and config failures           │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → ApiError → User     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Validation messages are the exact text shown next to a form field
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No country with the given code is in the catalog.
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    /// An action that requires a session was attempted while logged out.
    ///
    /// ## When This Occurs
    /// - Toggling a favorite without logging in first
    #[error("Please log in to {action}")]
    NotAuthenticated { action: String },

    /// A stored session token could not be parsed.
    #[error("Malformed session token: {0}")]
    MalformedToken(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The `field` strings are display labels ("Username", "Email"), so the
/// rendered message can be shown verbatim under the matching input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value does not have the expected shape.
    #[error("{field} is invalid")]
    Invalid { field: String },

    /// Invalid format with an explanation (country codes).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Password confirmation differs from the password.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CountryNotFound("XYZ".to_string());
        assert_eq!(err.to_string(), "Country not found: XYZ");

        let err = CoreError::NotAuthenticated {
            action: "add favorites".to_string(),
        };
        assert_eq!(err.to_string(), "Please log in to add favorites");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Username".to_string(),
        };
        assert_eq!(err.to_string(), "Username is required");

        let err = ValidationError::TooShort {
            field: "Password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = ValidationError::Invalid {
            field: "Email".to_string(),
        };
        assert_eq!(err.to_string(), "Email is invalid");

        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "Email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
