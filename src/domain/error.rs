//! Domain-level error types for podium.
//!
//! All errors are typed with `thiserror` and carry a message that can be
//! shown to the user as-is.

use thiserror::Error;

/// Application-level errors, grouped as validation, authentication and
/// network/API failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field was left empty.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password does not satisfy the policy.
    #[error("Password is too weak: {}", .unmet.join(", "))]
    WeakPassword { unmet: Vec<&'static str> },

    /// Login rejected by the server.
    #[error("Invalid credentials. Check your email and password")]
    InvalidCredentials,

    /// No token is stored; the user has to log in first.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The server rejected the stored token; it has been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Registration with an email that is already taken.
    #[error("This email is already in use")]
    EmailInUse,

    /// Requested resource does not exist.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Any other non-success API response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a network error from a reqwest error.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Whether the user has to log in (again) to recover.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::SessionExpired)
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_password_lists_rules() {
        let err = AppError::WeakPassword {
            unmet: vec!["at least 8 characters", "a digit"],
        };
        assert_eq!(
            err.to_string(),
            "Password is too weak: at least 8 characters, a digit"
        );
    }

    #[test]
    fn test_is_auth() {
        assert!(AppError::SessionExpired.is_auth());
        assert!(AppError::NotAuthenticated.is_auth());
        assert!(!AppError::InvalidCredentials.is_auth());
        assert!(!AppError::MissingField { field: "Title" }.is_auth());
    }
}
