//! Error type for function invocations.
//!
//! # Design
//! A non-success response carries the response body text as its message and
//! nothing else in its `Display` output, so callers that only look at the
//! message see exactly what the function sent back. The status code and
//! reason are attached as fields for callers that want them.
//!
//! Transport failures and JSON failures are passed through transparently.

use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum LambdogError {
    /// The function answered with a status outside `200..=299`.
    #[error("{message}")]
    Status {
        status: u16,
        status_text: String,
        message: String,
    },

    /// The transport itself failed (network error, aborted request, ...).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The payload could not be encoded, or a response declared as JSON
    /// could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A `:name` placeholder in the function path had no matching parameter.
    #[error("missing value for path parameter `{name}`")]
    MissingParam { name: String },

    /// `Lambdog::request` was called without `function_name`.
    #[error("no function name given")]
    MissingFunctionName,

    /// Neither a default transport nor a per-call `fetch` was available.
    #[error("no transport configured")]
    NoTransport,
}

impl LambdogError {
    /// HTTP status of a non-success response, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            LambdogError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
