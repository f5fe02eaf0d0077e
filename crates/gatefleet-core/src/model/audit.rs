// ── Audit, alert and scan records ──
//
// Everything the operator inbox holds. All three live in capped,
// newest-first logs and are not persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::DeviceId;

/// What a fleet operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Add,
    Switch,
    Delete,
    Retry,
    TimeSync,
    DatabaseSync,
    AutoSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failed,
    Warning,
    Info,
}

/// One line of the device audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub device_id: DeviceId,
    pub action: AuditAction,
    pub status: AuditStatus,
    pub message: String,
}

/// A free-form operator alert raised by a device or integration.
///
/// The payload is stored as sent, minus any `id`/`timestamp` keys,
/// which are assigned on receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// A card read that is waiting for the operator to enroll or dismiss it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingScan {
    pub id: u64,
    pub uid: String,
    /// The uid is not yet in the central database.
    pub is_new: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "device_ip", skip_serializing_if = "Option::is_none")]
    pub device_ip: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actions_render_screaming_snake() {
        assert_eq!(AuditAction::DatabaseSync.to_string(), "DATABASE_SYNC");
        assert_eq!(AuditAction::TimeSync.to_string(), "TIME_SYNC");
        assert_eq!(
            serde_json::to_value(AuditStatus::Warning).unwrap(),
            json!("WARNING")
        );
    }

    #[test]
    fn alert_payload_is_flattened() {
        let mut payload = serde_json::Map::new();
        payload.insert("type".into(), json!("tamper"));
        payload.insert("deviceId".into(), json!("device_1"));
        let alert = Alert {
            id: 7,
            timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
            payload,
        };
        let v = serde_json::to_value(&alert).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["type"], "tamper");
        assert_eq!(v["deviceId"], "device_1");
    }
}
