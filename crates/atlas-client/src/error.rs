//! # Client Error Types
//!
//! Error types for network, storage and configuration operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Storage             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  StorageFailed          │ │
//! │  │  InvalidUrl     │  │  Status         │  │  StorageCorrupt         │ │
//! │  │  ConfigLoad/Save│  │  InvalidResponse│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Domain errors from atlas-core pass through as `Core`.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transport errors never escape the catalog store: they become
//! `status = failed` plus the error's display text, so their messages are the
//! exact text a user sees.

use atlas_core::validation::FieldErrors;
use atlas_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response (DNS, refused, timeout, TLS).
    #[error("Network Error")]
    Network(String),

    /// The API answered with a non-2xx status.
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// The body was not the expected JSON.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageFailed(String),

    /// The storage file exists but is not a JSON object of strings.
    #[error("Storage file is corrupt: {0}")]
    StorageCorrupt(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A login or registration form failed local validation.
    #[error("{0}")]
    InvalidForm(FieldErrors),

    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status.as_u16())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::InvalidForm(errors)
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::StorageFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if this error came from talking to the remote API.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Status(_) | ClientError::InvalidResponse(_)
        )
    }

    /// Returns true if the user can fix this by correcting their input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidForm(_) | ClientError::Core(CoreError::Validation(_))
        )
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            ClientError::StorageFailed(_) | ClientError::StorageCorrupt(_)
        )
    }
}
