// ── Runtime fleet configuration ──
//
// Where the fleet keeps its snapshots and how patient it is with devices.
// The binary builds a `FleetConfig` from its config file and flags;
// core never reads config files itself.

use std::path::PathBuf;

use gatefleet_api::{RequestTimeouts, TransportConfig};

/// Newest-first audit entries kept in memory.
pub const DEFAULT_AUDIT_CAPACITY: usize = 500;
/// Newest-first operator alerts kept in memory.
pub const DEFAULT_ALERT_CAPACITY: usize = 100;
/// Card scans waiting for enrollment.
pub const DEFAULT_SCAN_CAPACITY: usize = 10;

/// Configuration for one control point.
///
/// Built by the CLI, passed to [`Fleet::open`](crate::Fleet::open).
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Directory holding `devices.json`, `users.json` and `settings.json`.
    pub data_dir: PathBuf,
    /// Per-call budgets for device requests.
    pub timeouts: RequestTimeouts,
    /// Accept self-signed certificates on `https://` device endpoints.
    pub accept_invalid_certs: bool,
    pub audit_capacity: usize,
    pub alert_capacity: usize,
    pub scan_capacity: usize,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("database"),
            timeouts: RequestTimeouts::default(),
            accept_invalid_certs: false,
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            scan_capacity: DEFAULT_SCAN_CAPACITY,
        }
    }
}

impl FleetConfig {
    /// Configuration rooted at `data_dir`, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Transport settings shared by every device client in the fleet.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeouts: self.timeouts,
            accept_invalid_certs: self.accept_invalid_certs,
            ..TransportConfig::default()
        }
    }
}
