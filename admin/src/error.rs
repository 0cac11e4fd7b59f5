//! Error types for the Sethmo admin console.
//!
//! - [`ApiError`] - Content API failures (network, server, decoding)
//! - [`ValidationError`] - Local pre-save checks
//! - [`SessionError`] - Login, logout and password changes
//! - [`ConfigError`] - Environment configuration
//! - [`ContentError`] - Content-type lookup
//!
//! Editors never surface these directly: they turn them into a status
//! message. Everything else propagates them with `?`.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Errors talking to the content API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never completed (DNS, connection refused, timeout).
    #[error("Network failure: {0}")]
    Network(String),

    /// Non-2xx response. `message` is already a display string.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response body was not the JSON we expected.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The operation needs a session and none was supplied.
    #[error("Not logged in")]
    Unauthorized,
}

impl ApiError {
    /// HTTP status of a server error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether logging in again could fix the request.
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized) || matches!(self.status(), Some(401 | 403))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Local validation failures, raised before anything is sent.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A record is missing a required field.
    #[error("record {index}: {rule}")]
    MissingField {
        index: usize,
        field: String,
        rule: String,
    },

    /// The embedded rule set itself could not be compiled.
    #[error("Invalid schema: {0}")]
    Schema(String),
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors managing the login session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not logged in. Run 'sethmo-admin login' first")]
    NotLoggedIn,

    #[error("New passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Api(#[from] ApiError),
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),

    #[error("Invalid value for {key}: '{value}' is not a number")]
    InvalidNumber { key: String, value: String },
}

// =============================================================================
// Content Errors
// =============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
    #[error("Unknown content type '{0}'. Run 'sethmo-admin types' for the list")]
    UnknownContentType(String),

    #[error("'{0}' is a single document, not a collection")]
    NotACollection(String),

    #[error("'{0}' is a collection, not a single document")]
    NotADocument(String),

    #[error("'{0}' has no image upload endpoint")]
    NoUploadRoute(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for content API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_message_only() {
        let err = ApiError::Server {
            status: 500,
            message: "Database unavailable".into(),
        };
        assert_eq!(err.to_string(), "Database unavailable");
        assert_eq!(err.status(), Some(500));
        assert_eq!(ApiError::Unauthorized.status(), None);
    }

    #[test]
    fn test_needs_login() {
        let server = |status| ApiError::Server {
            status,
            message: "denied".into(),
        };
        assert!(ApiError::Unauthorized.needs_login());
        assert!(server(401).needs_login());
        assert!(server(403).needs_login());
        assert!(!server(500).needs_login());
        assert!(!ApiError::Network("refused".into()).needs_login());
    }

    #[test]
    fn test_api_error_converts_into_session_error() {
        let session_err: SessionError = ApiError::Network("connection refused".into()).into();
        assert!(session_err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_missing_field_format() {
        let err = ValidationError::MissingField {
            index: 2,
            field: "title".into(),
            rule: "Please provide a Job Title for all listings.".into(),
        };
        assert_eq!(err.to_string(), "record 2: Please provide a Job Title for all listings.");
    }
}
