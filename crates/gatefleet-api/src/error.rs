use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `gatefleet-api` crate.
///
/// Covers every way a single device request can fail: transport,
/// timeouts, non-success responses, and unreadable bodies.
/// `gatefleet-core` folds all of these into its `Remote` variant.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request did not complete within its per-call budget.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Device ──────────────────────────────────────────────────────
    /// The device answered with a non-2xx status.
    #[error("Device responded with HTTP {status}: {message}")]
    Device { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a reqwest failure, surfacing timeouts with the budget
    /// that was exceeded.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_secs: timeout.as_secs(),
            }
        } else {
            Self::Transport(err)
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Device { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the device answered 404 (endpoint missing on
    /// this firmware).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Device { status: 404, .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        assert!(Error::Timeout { timeout_secs: 3 }.is_transient());
    }

    #[test]
    fn server_errors_are_transient_client_errors_are_not() {
        let busy = Error::Device {
            status: 503,
            message: "busy".into(),
        };
        let bad = Error::Device {
            status: 400,
            message: "bad".into(),
        };
        assert!(busy.is_transient());
        assert!(!bad.is_transient());
    }

    #[test]
    fn device_404_is_not_found() {
        let err = Error::Device {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Device responded with HTTP 404: ");
    }
}
