// ── Domain model ──
//
// Canonical types shared by the registry, the stores and every API surface.

pub mod audit;
pub mod device;
pub mod entity_id;
pub mod user;

pub use audit::{Alert, AuditAction, AuditLogEntry, AuditStatus, PendingScan};
pub use device::{ConnectionStatus, Device, DeviceListing, DeviceStatus, DeviceView};
pub use entity_id::{DeviceId, Endpoint};
pub use user::{CentralUser, Settings, UserType};
