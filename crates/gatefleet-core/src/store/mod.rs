// ── Fleet state storage ──
//
// In-memory collections owned by the fleet, and the JSON snapshots
// they are persisted to.

pub mod registry;
pub mod ring;
pub mod snapshot;
pub mod users;

pub use registry::DeviceRegistry;
pub use ring::CappedLog;
pub use snapshot::{DevicesDocument, SnapshotStore, UsersDocument};
pub use users::UserStore;
