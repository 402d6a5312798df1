/// Errors from the Lacus API layer.
use std::time::Duration;

use thiserror::Error;

/// Typed failures of a call against a Lacus instance.
#[derive(Debug, Error)]
pub enum LacusError {
    /// The caller supplied insufficient or contradictory parameters.
    /// Detected locally, before any network call.
    #[error("Invalid capture request: {0}")]
    InvalidRequest(String),

    /// The instance URL or client options cannot produce a usable HTTP client.
    #[error("Invalid Lacus instance '{url}': {reason}")]
    InvalidInstance {
        /// The base URL as given by the caller.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Non-success HTTP status, transport failure, or a body that is not the expected JSON.
    #[error("{}", remote_message(*status, message))]
    Remote {
        /// HTTP status code, `None` when no response was received.
        status: Option<u16>,
        /// Raw response body or transport error text.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Request to {url} timed out after {}s", timeout.as_secs_f64())]
    Timeout {
        /// The URL that was being requested.
        url: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The instance explicitly reports the capture identifier as unknown.
    #[error("Capture '{uuid}' is unknown to this instance")]
    NotFound {
        /// The identifier that was queried.
        uuid: String,
    },
}

fn remote_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Lacus returned HTTP {code}: {message}"),
        None => format!("Lacus request failed: {message}"),
    }
}

/// Shorthand result type for the API layer.
pub type Result<T, E = LacusError> = std::result::Result<T, E>;

impl LacusError {
    /// Build a `Remote` error for a response that could not be decoded.
    pub(crate) fn malformed(status: u16, detail: impl std::fmt::Display) -> Self {
        Self::Remote {
            status: Some(status),
            message: format!("malformed response body: {detail}"),
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidRequest(_) | Self::InvalidInstance { .. } => 2,
            Self::NotFound { .. } => 4,
            Self::Timeout { .. } => 5,
            Self::Remote { .. } => 1,
        }
    }

    /// Machine-readable error code (snake_case), used in the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidInstance { .. } => "invalid_instance",
            Self::Remote { .. } => "remote_error",
            Self::Timeout { .. } => "timeout",
            Self::NotFound { .. } => "not_found",
        }
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => *status,
            _ => None,
        }
    }
}
