//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use gatefleet_config::ConfigError;
use gatefleet_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(gatefleet::not_found),
        help("Run: gatefleet {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(gatefleet::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("No active device selected")]
    #[diagnostic(
        code(gatefleet::no_active_device),
        help("Register one with: gatefleet devices add --name <NAME> --endpoint <HOST>")
    )]
    NoActiveDevice,

    #[error("Device {device_id} is not connected")]
    #[diagnostic(
        code(gatefleet::not_connected),
        help("Try: gatefleet devices retry {device_id}")
    )]
    NotConnected { device_id: String },

    #[error("Device request failed: {message}")]
    #[diagnostic(
        code(gatefleet::device_error),
        help("Check that the device is powered and reachable from this host.")
    )]
    Device { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gatefleet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration / storage ──────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(gatefleet::config),
        help("Inspect the effective configuration with: gatefleet config show")
    )]
    Config(#[from] ConfigError),

    #[error("Failed to write {path}: {reason}")]
    #[diagnostic(
        code(gatefleet::persistence),
        help("Check permissions on the data directory, or pass --data-dir.")
    )]
    Persistence { path: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(gatefleet::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(gatefleet::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::NotConnected { .. } | Self::Device { .. } => exit_code::CONNECTION,
            Self::Validation { .. }
            | Self::NoActiveDevice
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::DuplicateEndpoint {
                endpoint,
                existing_id,
            } => CliError::Conflict {
                resource_type: "device endpoint".into(),
                identifier: format!("{endpoint} (ID: {existing_id})"),
            },

            CoreError::DuplicateUser { uid } => CliError::Conflict {
                resource_type: "user".into(),
                identifier: uid,
            },

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::UserNotFound { uid } => CliError::NotFound {
                resource_type: "user".into(),
                identifier: uid,
                list_command: "users list".into(),
            },

            CoreError::ScanNotFound { id } => CliError::Validation {
                field: "scan".into(),
                reason: format!("no pending scan with id {id}"),
            },

            CoreError::NoActiveDevice => CliError::NoActiveDevice,

            CoreError::NotConnected { device_id } => CliError::NotConnected { device_id },

            CoreError::Remote { message, .. } => CliError::Device { message },

            CoreError::Persistence { path, reason } => CliError::Persistence { path, reason },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_meaningful_exit_codes() {
        let err = CliError::from(CoreError::DeviceNotFound {
            identifier: "device_1".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        let err = CliError::from(CoreError::DuplicateUser { uid: "A1".into() });
        assert_eq!(err.exit_code(), exit_code::CONFLICT);

        let err = CliError::from(CoreError::Remote {
            message: "connection refused".into(),
            transient: true,
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);

        let err = CliError::from(CoreError::Validation {
            message: "Name is required".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
