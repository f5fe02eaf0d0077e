//! Device registry and replication engine for a fleet of access-control
//! devices, sitting between `gatefleet-api` and the CLI/HTTP surfaces.
//!
//! - **[`Fleet`]**: central facade. [`Fleet::open`] loads the JSON
//!   snapshots from the data directory; [`Fleet::start`] spawns the
//!   auto-sync subscriber that pushes every committed user change to all
//!   connected devices. Device I/O never happens under a lock.
//!
//! - **Registry** ([`store::DeviceRegistry`]): ordered devices with unique
//!   endpoints and exactly one active device whenever any exist.
//!
//! - **Prober** ([`prober`]): `/api/info` health checks and best-effort
//!   clock sync.
//!
//! - **Replication** ([`replication`]): single-device and concurrent
//!   fleet-wide database pushes, plus the [`UserStoreEvent`] stream.
//!
//! - **Inbox**: capped newest-first audit trail, alerts and pending scans.

pub mod config;
pub mod error;
mod fleet;
pub mod model;
pub mod prober;
pub mod replication;
pub mod requests;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::FleetConfig;
pub use error::CoreError;
pub use fleet::Fleet;
pub use replication::{AutoSyncReport, DatabaseSnapshot, SyncResult, UserStoreEvent};
pub use requests::*;

pub use model::{
    Alert, AuditAction, AuditLogEntry, AuditStatus, CentralUser, ConnectionStatus, Device,
    DeviceId, DeviceListing, DeviceStatus, DeviceView, Endpoint, PendingScan, Settings, UserType,
};
