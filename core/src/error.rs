//! Error type for the task-manager API client.
//!
//! # Design
//! Every failure the client can produce is a single `ApiError` carrying a
//! stable `ErrorKind` plus a human-readable message. The kind is assigned
//! exactly once, at the pipeline boundary; endpoint modules may reword the
//! message for their callers but never change the kind. Non-2xx statuses
//! map through a fixed table with no retries.

use thiserror::Error;

/// Stable failure category. This is the only error taxonomy callers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Server returned 401 — the session token is missing, expired or bad.
    Unauthorized,
    /// Server returned 403.
    Forbidden,
    /// Server returned 404.
    NotFound,
    /// Server returned 500.
    Server,
    /// No HTTP response was received (DNS, refused connection, timeout).
    Network,
    /// Caller input rejected before any network activity.
    Validation,
    /// Local token persistence failed.
    Storage,
    /// Any other non-2xx status, or a 2xx body that failed to decode.
    Unknown,
}

/// A classified failure: `kind` for programmatic handling, `message` for
/// display. The message never contains token material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a non-2xx HTTP status. Fixed mapping, independent of the
    /// request that produced it.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::new(ErrorKind::Unauthorized, "Not authorized; please log in again."),
            403 => Self::new(ErrorKind::Forbidden, "Access denied."),
            404 => Self::new(ErrorKind::NotFound, "Resource not found."),
            500 => Self::new(ErrorKind::Server, "Internal server error."),
            _ => Self::new(ErrorKind::Unknown, "Unknown error; try again."),
        }
    }

    /// Transport failed before any response arrived.
    pub fn network() -> Self {
        Self::new(ErrorKind::Network, "Connection error; check your network.")
    }

    /// The request exceeded the configured timeout. Same kind as any other
    /// transport failure, distinct wording.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Network, "Request timed out; check your network.")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// A 2xx response whose body did not match the expected shape. Malformed
    /// data must not flow past the pipeline boundary.
    pub fn decode(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Unknown, format!("Malformed server response: {err}"))
    }

    /// Replace the message, keeping the kind. Used by endpoint modules that
    /// reword a classified error for their callers.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("Session storage failed: {err}"))
    }
}
