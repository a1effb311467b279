//! Error types for API calls.
//!
//! Splits failures the way the views need them: transport problems, status
//! classes for display, structured 422 field errors, terminal 404s and the
//! 401 that downgrades a stale session.

use thiserror::Error;

use crate::api::types::FieldMessages;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure before a response arrived
    #[error("Connection failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 404; the resource is gone and retrying will not help
    #[error("Requested resource not found")]
    NotFound,

    /// 401; the token is missing, expired or revoked
    #[error("Unauthorized")]
    Unauthorized,

    /// 422 with per-field messages
    #[error("Validation failed")]
    Validation(FieldMessages),

    /// Any other non-2xx response
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        /// Raw response text, shown as details in error dialogs
        details: String,
    },

    /// Configured base URL cannot be extended with endpoint paths
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(status: u16, details: String) -> Self {
        ApiError::Status {
            status,
            message: describe_status(status),
            details,
        }
    }

    /// HTTP status code when the failure came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Unauthorized => Some(401),
            ApiError::Validation(_) => Some(422),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => None,
        }
    }

    /// Whether offering "Try again" makes sense
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ApiError::NotFound)
    }

    /// Status-class message used by list views
    pub fn status_message(&self) -> String {
        match self.status_code() {
            Some(code) => describe_status(code),
            None => self.to_string(),
        }
    }

    /// Response text worth showing below the title, if any
    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::Status { details, .. } if !details.is_empty() => Some(details.as_str()),
            _ => None,
        }
    }
}

/// Human-readable text for an HTTP status class.
pub fn describe_status(code: u16) -> String {
    match code / 100 {
        4 => format!("Wrong request ({})", code),
        5 => format!("Server error ({})", code),
        _ => format!("Unknown error (code: {})", code),
    }
}
