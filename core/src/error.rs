//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the item does not exist" from "the server returned an unexpected status."
//! Every variant collapses to one human-readable string through
//! `ApiError::message`, which is what the store records in `TodoState::error`.

use thiserror::Error;

/// Message used when neither the server nor the transport said anything.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// Errors returned by `TodoClient`, transports and `TodoStore` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The input was rejected before any request was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("not found: {}", .message.as_deref().unwrap_or("no message"))]
    NotFound { message: Option<String> },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// The message shown to a user.
    ///
    /// Priority: the server's `message` payload, then the transport-level
    /// text (`Request failed with status code N` for bare HTTP failures), then
    /// `FALLBACK_MESSAGE`.
    pub fn message(&self) -> String {
        let message = match self {
            ApiError::Validation(msg)
            | ApiError::Transport(msg)
            | ApiError::Serialization(msg)
            | ApiError::Deserialization(msg) => msg.clone(),
            ApiError::NotFound { message } => message
                .clone()
                .unwrap_or_else(|| status_failure_text(404)),
            ApiError::Server { status, message } => message
                .clone()
                .unwrap_or_else(|| status_failure_text(*status)),
        };
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_failure_text(status: u16) -> String {
    format!("Request failed with status code {status}")
}

/// Errors raised while reading `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidBaseUrl { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_payload_message_wins() {
        let err = ApiError::Server {
            status: 500,
            message: Some("database unavailable".to_string()),
        };
        assert_eq!(err.message(), "database unavailable");
    }

    #[test]
    fn missing_payload_uses_status_text() {
        let err = ApiError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(err.message(), "Request failed with status code 502");
        let err = ApiError::NotFound { message: None };
        assert_eq!(err.message(), "Request failed with status code 404");
    }

    #[test]
    fn empty_message_falls_back() {
        let err = ApiError::Transport("   ".to_string());
        assert_eq!(err.message(), FALLBACK_MESSAGE);
        let err = ApiError::NotFound {
            message: Some(String::new()),
        };
        assert_eq!(err.message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::Server {
            status: 400,
            message: Some("title is required".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 400: title is required");
        assert_eq!(err.status(), Some(400));
    }
}
