//! Per-item failure taxonomy for fetches and probes

use thiserror::Error;

/// Why a single fetch or probe did not succeed.
///
/// These never leave the stage that produced them; they only decide whether
/// an item is dropped and are logged at debug level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Connection refused, DNS failure, TLS failure, bad proxy URL
    #[error("transport error: {0}")]
    Transport(String),
    /// Response status other than 200
    #[error("unexpected HTTP status: {0}")]
    Status(u16),
    /// Deadline exceeded
    #[error("deadline exceeded")]
    Timeout,
    /// Malformed body or JSON
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_decode() {
            ProbeError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProbeError::Status(status.as_u16())
        } else {
            ProbeError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Decode(err.to_string())
    }
}
