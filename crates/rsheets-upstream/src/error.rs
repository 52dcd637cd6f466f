//! Upstream error types.

use thiserror::Error;

/// One structured error detail from an upstream error body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpstreamErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub message: String,
}

/// Errors surfaced by upstream spreadsheet clients.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream service rejected the call with a status code and a list
    /// of error details. The API layer passes the status through largely
    /// unchanged.
    #[error("upstream error (status {status})")]
    Api {
        status: u16,
        errors: Vec<UpstreamErrorDetail>,
    },

    /// Network-level failure before a structured response was produced.
    #[error("network error: {message}")]
    Network { message: String },

    /// The upstream response could not be parsed into the expected shape.
    #[error("invalid upstream response: {message}")]
    InvalidResponse { message: String },
}

impl UpstreamError {
    /// Convenience constructor for a single-detail structured error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        UpstreamError::Api {
            status,
            errors: vec![UpstreamErrorDetail {
                reason: None,
                message: message.into(),
            }],
        }
    }

    /// The first error detail message, when the error is structured.
    pub fn primary_message(&self) -> Option<&str> {
        match self {
            UpstreamError::Api { errors, .. } => errors.first().map(|e| e.message.as_str()),
            _ => None,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
