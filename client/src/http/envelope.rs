//! The uniform response envelope every endpoint returns.

use serde::{Deserialize, Serialize};

/// Envelope `code` value signalling application-level success.
pub const SUCCESS_CODE: i64 = 200;

/// Response envelope `{code, message, data?, timestamp?}`.
///
/// A 2xx HTTP status with a non-success `code` is not converted into an
/// error by the client; callers branch on [`ApiResponse::is_success`]
/// themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// Application-level status code.
    pub code: i64,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    /// Typed payload, when the endpoint returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Server-side timestamp, when the endpoint sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Whether the envelope signals application-level success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Consume the envelope, yielding the payload of a successful response.
    ///
    /// Returns `None` when the envelope is unsuccessful or carries no data.
    #[must_use]
    pub fn into_success_data(self) -> Option<T> {
        if self.is_success() { self.data } else { None }
    }
}
