//! Error type for the Akismet client.
//!
//! # Design
//! One error type covers every way an operation can fail. Each variant keeps
//! the endpoint URL it was raised for, and `message()` / `code()` expose the
//! human-readable text and numeric code uniformly regardless of variant.
//! An invalid key or a spam verdict is never an error.

use thiserror::Error;

/// Message used when a submission is not acknowledged with the expected body.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid server response.";

/// Errors returned by `AkismetClient` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The HTTP exchange could not be completed.
    #[error("{message}")]
    Transport { message: String, url: String },

    /// The server answered with a status outside the 2xx class.
    #[error("{reason}")]
    Status {
        status: u16,
        reason: String,
        url: String,
    },

    /// The service flagged an operational problem via `X-akismet-alert-code`.
    #[error("{message}")]
    Alert {
        code: i64,
        message: String,
        url: String,
    },

    /// The service rejected a malformed request via `X-akismet-debug-help`.
    #[error("{message}")]
    DebugHelp { message: String, url: String },

    /// A submission was not acknowledged with the expected body.
    #[error("Invalid server response.")]
    InvalidResponse { url: String },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl ClientError {
    /// Human-readable message, as reported by the service or transport.
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport { message, .. }
            | ClientError::Alert { message, .. }
            | ClientError::DebugHelp { message, .. } => message.clone(),
            ClientError::Status { reason, .. } => reason.clone(),
            ClientError::InvalidResponse { .. } => INVALID_RESPONSE_MESSAGE.to_string(),
            ClientError::InvalidBaseUrl { .. } => self.to_string(),
        }
    }

    /// HTTP status for `Status`, alert code for `Alert`, `None` otherwise.
    pub fn code(&self) -> Option<i64> {
        match self {
            ClientError::Status { status, .. } => Some(i64::from(*status)),
            ClientError::Alert { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The URL of the request that failed.
    pub fn url(&self) -> Option<&str> {
        match self {
            ClientError::Transport { url, .. }
            | ClientError::Status { url, .. }
            | ClientError::Alert { url, .. }
            | ClientError::DebugHelp { url, .. }
            | ClientError::InvalidResponse { url }
            | ClientError::InvalidBaseUrl { url, .. } => Some(url.as_str()),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://k.rest.akismet.com/1.1/comment-check";

    #[test]
    fn alert_exposes_code_and_message() {
        let err = ClientError::Alert {
            code: 123,
            message: "Key revoked".to_string(),
            url: URL.to_string(),
        };
        assert_eq!(err.code(), Some(123));
        assert_eq!(err.message(), "Key revoked");
        assert_eq!(err.to_string(), "Key revoked");
        assert_eq!(err.url(), Some(URL));
    }

    #[test]
    fn status_code_is_the_http_status() {
        let err = ClientError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
            url: URL.to_string(),
        };
        assert_eq!(err.code(), Some(503));
        assert_eq!(err.message(), "Service Unavailable");
    }

    #[test]
    fn invalid_response_has_fixed_message() {
        let err = ClientError::InvalidResponse { url: URL.to_string() };
        assert_eq!(err.message(), INVALID_RESPONSE_MESSAGE);
        assert_eq!(err.to_string(), INVALID_RESPONSE_MESSAGE);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn transport_and_debug_help_have_no_code() {
        let transport = ClientError::Transport {
            message: "dns failure".to_string(),
            url: URL.to_string(),
        };
        let debug = ClientError::DebugHelp {
            message: "Empty \"blog\" value".to_string(),
            url: URL.to_string(),
        };
        assert_eq!(transport.code(), None);
        assert_eq!(debug.code(), None);
        assert_eq!(debug.message(), "Empty \"blog\" value");
    }
}
