//! Error types shared by the request layer.
//!
//! Every network-calling operation returns [`RequestOutcome`], so callers get
//! either a payload or exactly one of these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of a remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The group has no endpoint with a usable URL.
    #[error("No valid endpoints configured")]
    NoEndpoints,

    #[error("Request to {endpoint} timed out after {timeout_seconds} seconds")]
    Timeout {
        endpoint: String,
        timeout_seconds: u64,
    },

    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// Non-2xx response.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The caller asked to stop. Never reported as a failure.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unexpected response shape: {0}")]
    Parse(String),

    #[error("Failed to write audio to {}: {reason}", path.display())]
    Artifact { path: PathBuf, reason: String },
}

impl ApiError {
    pub(crate) fn status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Classifies a reqwest failure against `endpoint`.
    pub(crate) fn from_reqwest(endpoint: &str, timeout_seconds: u64, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
                timeout_seconds,
            }
        } else if let Some(status) = err.status() {
            Self::status(status)
        } else {
            Self::Transport {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

/// Uniform result of any network-calling operation.
pub type RequestOutcome<T = String> = Result<T, ApiError>;
