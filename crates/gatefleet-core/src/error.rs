// ── Core error types ──
//
// Errors surfaced by fleet operations. Device transport failures from
// `gatefleet-api` are folded into `Remote`; callers never match on
// reqwest errors or raw HTTP statuses.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Device with endpoint {endpoint} already exists (ID: {existing_id})")]
    DuplicateEndpoint {
        endpoint: String,
        existing_id: String,
    },

    #[error("User with UID {uid} already exists")]
    DuplicateUser { uid: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("User not found: {uid}")]
    UserNotFound { uid: String },

    #[error("Pending scan not found: {id}")]
    ScanNotFound { id: u64 },

    // ── Device state errors ──────────────────────────────────────────
    #[error("No active device selected")]
    NoActiveDevice,

    #[error("Device {device_id} is not connected")]
    NotConnected { device_id: String },

    #[error("Device request failed: {message}")]
    Remote {
        message: String,
        /// Timeouts, refused connections and 5xx answers.
        transient: bool,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Failed to persist {path}: {reason}")]
    Persistence { path: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the caller sent something unacceptable, as opposed to a
    /// device or local failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::DuplicateEndpoint { .. }
                | Self::DuplicateUser { .. }
                | Self::DeviceNotFound { .. }
                | Self::UserNotFound { .. }
                | Self::ScanNotFound { .. }
                | Self::NoActiveDevice
                | Self::NotConnected { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotFound { .. } | Self::UserNotFound { .. } | Self::ScanNotFound { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gatefleet_api::Error> for CoreError {
    fn from(err: gatefleet_api::Error) -> Self {
        match err {
            gatefleet_api::Error::InvalidUrl(e) => CoreError::Validation {
                message: format!("Invalid device URL: {e}"),
            },
            other => CoreError::Remote {
                transient: other.is_transient(),
                message: other.to_string(),
            },
        }
    }
}
