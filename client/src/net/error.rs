//! Error taxonomy for calls that cross the gateway to the backend.
//!
//! ERROR HANDLING
//! ==============
//! Callers branch on the *kind* of failure: only an auth rejection means the
//! session is dead; every other kind leaves session state alone and is
//! surfaced to the UI. That policy lives with the callers — this module only
//! classifies.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::de::DeserializeOwned;

use super::types::{Envelope, ErrorBody};

/// Classified failure of a backend call.
///
/// `Clone + PartialEq` so outcomes can flow through a shared refresh future
/// to every coalesced caller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No persisted refresh token exists; nothing to refresh with.
    #[error("no refresh token available")]
    NoRefreshToken,
    /// 401: credential invalid or expired. The session must die.
    #[error("authentication rejected: {message}")]
    AuthRejected { message: String },
    /// 403: authenticated but not authorized for this resource.
    #[error("forbidden: {message}")]
    Forbidden { message: String },
    /// 404 passthrough.
    #[error("not found: {message}")]
    NotFound { message: String },
    /// 503: the gateway reports the backend as unreachable. Retry later.
    #[error("backend unavailable: {message}")]
    UpstreamUnavailable { message: String },
    /// Other 5xx.
    #[error("server error {status}: {message}")]
    ServerError { status: u16, message: String },
    /// Status 0: client-side connectivity or CORS failure.
    #[error("network error: {message}")]
    NetworkError { message: String },
    /// Remaining 4xx (validation rejections and the like), passed through.
    #[error("request rejected {status}: {message}")]
    Rejected { status: u16, message: String },
    /// A success status whose body did not match the envelope schema.
    #[error("malformed response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Kinds that invalidate the whole session when a refresh fails with
    /// them. Transient kinds are not in this set: the session survives.
    #[must_use]
    pub fn is_auth_fatal(&self) -> bool {
        matches!(self, ApiError::AuthRejected { .. } | ApiError::NoRefreshToken)
    }
}

/// Extract the human-readable message from an error envelope body, falling
/// back to the raw body when the envelope does not parse.
#[must_use]
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<Envelope<ErrorBody>>(body) {
        Ok(env) => env.data.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_owned(),
        Err(_) => body.chars().take(200).collect(),
    }
}

/// Map a non-success HTTP status plus response body to an error kind.
#[must_use]
pub fn classify_response(status: u16, body: &str) -> ApiError {
    let message = error_message(body);
    match status {
        0 => ApiError::NetworkError { message },
        401 => ApiError::AuthRejected { message },
        403 => ApiError::Forbidden { message },
        404 => ApiError::NotFound { message },
        503 => ApiError::UpstreamUnavailable { message },
        500..=599 => ApiError::ServerError { status, message },
        _ => ApiError::Rejected { status, message },
    }
}

/// Decode the `data` payload out of a success envelope.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body is not a well-formed envelope
/// around a `T`.
pub fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|env| env.data)
        .map_err(|e| ApiError::Decode { message: e.to_string() })
}
