// ── Replication events ──
//
// Emitted after every committed user-database mutation. The auto-sync
// subscriber turns each one into a fleet-wide push.

use serde::Serialize;

use crate::model::DeviceId;

/// A committed change to the central user database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStoreEvent {
    UserAdded { name: String },
    UserUpdated { name: String },
    UserDeleted { uid: String },
    CreditUpdated { name: String, amount: i64 },
    /// The subscriber fell behind and dropped `missed` events; one push
    /// of the current snapshot covers them all.
    Resync { missed: u64 },
}

impl UserStoreEvent {
    /// Action label used in audit messages.
    pub fn action(&self) -> &'static str {
        match self {
            Self::UserAdded { .. } => "USER_ADDED",
            Self::UserUpdated { .. } => "USER_UPDATED",
            Self::UserDeleted { .. } => "USER_DELETED",
            Self::CreditUpdated { .. } => "CREDIT_UPDATED",
            Self::Resync { .. } => "RESYNC",
        }
    }

    /// Human-readable description of the change.
    pub fn detail(&self) -> String {
        match self {
            Self::UserAdded { name } => format!("New user \"{name}\" added"),
            Self::UserUpdated { name } => format!("User \"{name}\" updated"),
            Self::UserDeleted { uid } => format!("User with UID \"{uid}\" deleted"),
            Self::CreditUpdated { name, amount } => {
                format!("Credit updated for \"{name}\" ({amount:+})")
            }
            Self::Resync { missed } => format!("{missed} change(s) coalesced"),
        }
    }
}

/// Per-device outcome of a database push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub device_id: DeviceId,
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What the auto-sync subscriber did with one event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSyncReport {
    pub event: UserStoreEvent,
    pub results: Vec<SyncResult>,
}

impl AutoSyncReport {
    pub fn synced(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}
