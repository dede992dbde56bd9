//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Atlas                                  │
//! │                                                                         │
//! │  atlas favorite add CAN                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<String, ApiError>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Logged out? ──── CoreError::NotAuthenticated ────┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Fetch failed? ── ClientError::Network ───────── ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: "Please log in to add favorites"     exit status 1             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use atlas_client::ClientError;
use atlas_core::{CoreError, ValidationError};
use serde::Serialize;

/// Error returned from CLI commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_AUTHENTICATED",
///   "message": "Please log in to add favorites"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Country (or other resource) not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Action requires a logged-in session
    NotAuthenticated,

    /// Remote fetch ended in the failed state
    FetchFailed,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Durable storage could not be read or written
    StorageError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// A fetch that left the catalog in the failed state.
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::FetchFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CountryNotFound(code) => ApiError::not_found("Country", &code),
            CoreError::NotAuthenticated { .. } => {
                ApiError::new(ErrorCode::NotAuthenticated, err.to_string())
            }
            CoreError::MalformedToken(_) => {
                tracing::error!("Unexpected token error: {}", err);
                ApiError::internal("Session token is invalid")
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts client errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidForm(errors) => ApiError::validation(errors.to_string()),
            ClientError::Core(e) => ApiError::from(e),
            e if e.is_config_error() => ApiError::new(ErrorCode::ConfigError, e.to_string()),
            e if e.is_transport_error() => ApiError::fetch_failed(e.to_string()),
            e if e.is_storage_error() => {
                tracing::error!("Storage failure: {}", e);
                ApiError::new(ErrorCode::StorageError, e.to_string())
            }
            e => ApiError::internal(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::validation::{validate_login, LoginForm};

    #[test]
    fn test_not_authenticated_keeps_notice() {
        let err = ApiError::from(CoreError::NotAuthenticated {
            action: "add favorites".to_string(),
        });
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(err.message, "Please log in to add favorites");
    }

    #[test]
    fn test_client_error_categories() {
        let err = ApiError::from(ClientError::Status(404));
        assert_eq!(err.code, ErrorCode::FetchFailed);
        assert_eq!(err.message, "Request failed with status code 404");

        let err = ApiError::from(ClientError::InvalidUrl("nope".to_string()));
        assert_eq!(err.code, ErrorCode::ConfigError);

        let err = ApiError::from(ClientError::StorageCorrupt("bad json".to_string()));
        assert_eq!(err.code, ErrorCode::StorageError);

        let err = ApiError::from(ClientError::Core(CoreError::CountryNotFound(
            "XYZ".to_string(),
        )));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Country not found: XYZ");
    }

    #[test]
    fn test_form_errors_become_validation() {
        let errors = validate_login(&LoginForm::default()).unwrap_err();
        let err = ApiError::from(ClientError::from(errors));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Username is required"));
    }

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::new(ErrorCode::NotAuthenticated, "Please log in to add favorites");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_AUTHENTICATED");
        assert_eq!(json["message"], "Please log in to add favorites");
    }
}
