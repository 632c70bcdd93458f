//! Authentication and API error types.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Server answered 401
    #[error("Unauthorized{}", suffix(.message))]
    Unauthorized { message: Option<String> },

    /// Server answered with another non-success status
    #[error("Request failed with status code {status}{}", suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// No session to act on
    #[error("Not logged in")]
    NotLoggedIn,

    /// Invalid state transition in the session FSM
    #[error("Invalid auth state transition: {0}")]
    InvalidStateTransition(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Timeout error
    #[error("Request timed out")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn suffix(message: &Option<String>) -> String {
    match message.as_deref() {
        Some(m) if !m.is_empty() => format!(": {m}"),
        _ => String::new(),
    }
}

impl AuthError {
    /// Map a transport error, keeping timeouts distinct.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AuthError::Timeout
        } else {
            AuthError::Http(error)
        }
    }

    /// HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Unauthorized { .. } => Some(401),
            AuthError::Status { status, .. } => Some(*status),
            AuthError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this error is transient and the operation can be retried.
    ///
    /// Transient errors include:
    /// - Connection failures and timeouts
    /// - 5xx responses
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Timeout => true,
            AuthError::Status { status, .. } => (500..600).contains(status),
            AuthError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
            _ => false,
        }
    }

    /// Message suitable for the session's `error` field.
    ///
    /// Prefers the server-supplied `message`, then the transport error text,
    /// then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            AuthError::Unauthorized { message: Some(m) } | AuthError::Status { message: Some(m), .. }
                if !m.is_empty() =>
            {
                m.clone()
            }
            AuthError::Unauthorized { .. } => "Request failed with status code 401".to_string(),
            AuthError::Status { status, .. } => format!("Request failed with status code {status}"),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient_timeout() {
        assert!(AuthError::Timeout.is_transient());
    }

    #[test]
    fn test_is_transient_server_error() {
        let err = AuthError::Status {
            status: 503,
            message: None,
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_is_not_transient_client_errors() {
        assert!(!AuthError::Unauthorized { message: None }.is_transient());
        assert!(!AuthError::Status {
            status: 422,
            message: None
        }
        .is_transient());
        assert!(!AuthError::NotLoggedIn.is_transient());
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = AuthError::Unauthorized {
            message: Some("invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("Login failed"), "invalid credentials");
        assert_eq!(err.to_string(), "Unauthorized: invalid credentials");
    }

    #[test]
    fn test_user_message_falls_back_to_status_text() {
        let err = AuthError::Status {
            status: 500,
            message: Some(String::new()),
        };
        assert_eq!(
            err.user_message("Login failed"),
            "Request failed with status code 500"
        );
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_user_message_uses_error_text_for_other_failures() {
        assert_eq!(AuthError::Timeout.user_message("Login failed"), "Request timed out");
        assert_eq!(AuthError::NotLoggedIn.user_message("Login failed"), "Not logged in");
    }
}
