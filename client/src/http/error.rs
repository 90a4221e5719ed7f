//! Error normalization for the HTTP client.
//!
//! Transport failures, timeouts, and non-2xx statuses all collapse into
//! [`ApiError`] so callers have one shape to branch on. The [`ApiError::status`]
//! and [`ApiError::code`] accessors return zero for anything that never
//! reached an HTTP response, mirroring the envelope contract.

use crate::endpoints::EndpointError;
use crate::session::SessionError;

/// Failures surfaced while issuing API requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network transport failed before a response was received.
    #[error("transport failed: {message}")]
    Transport {
        /// Transport diagnostic.
        message: String,
    },
    /// The timeout fired before the request settled.
    #[error("request timed out: {message}")]
    Timeout {
        /// Timeout diagnostic.
        message: String,
    },
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Envelope `code` when the body carried one, else the HTTP status.
        code: i64,
        /// Envelope `message` when the body carried one, else a generic
        /// status-derived message.
        message: String,
    },
    /// The response body could not be decoded, or a request body could not
    /// be encoded.
    #[error("decode failed: {message}")]
    Decode {
        /// Serde diagnostic.
        message: String,
    },
    /// Endpoint resolution failed before any I/O happened.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    /// The session store failed while reading or writing auth state.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// HTTP status of the failure; zero when no response was received.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            _ => 0,
        }
    }

    /// Envelope code of the failure; zero when no response was received.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Status { code, .. } => *code,
            _ => 0,
        }
    }

    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                message: error.to_string(),
            }
        }
    }
}

/// Convenience alias for client and service calls.
pub type ApiResult<T> = Result<T, ApiError>;
