// ── Device domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::{DeviceId, Endpoint};

pub const DEFAULT_LOCATION: &str = "Not specified";

/// Connection state as last observed by a probe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceStatus {
    Connected,
    #[default]
    Disconnected,
    Error,
}

/// A registered access-control device.
///
/// `connected`, `status` and `error` move together: only
/// [`mark_connected`](Self::mark_connected) and
/// [`mark_unreachable`](Self::mark_unreachable) change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(alias = "ip")]
    pub endpoint: Endpoint,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub last_connected: Option<DateTime<Utc>>,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub status: DeviceStatus,
    /// Last `/api/info` payload, kept across failed probes.
    #[serde(default)]
    pub info: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_owned()
}

impl Device {
    /// A freshly registered, not yet probed device.
    pub fn new(
        id: DeviceId,
        name: impl Into<String>,
        endpoint: Endpoint,
        location: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            endpoint,
            location: location
                .map(|l| l.trim().to_owned())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(default_location),
            description: description.map(|d| d.trim().to_owned()).unwrap_or_default(),
            added_at: Utc::now(),
            last_connected: None,
            connected: false,
            status: DeviceStatus::Disconnected,
            info: None,
            error: None,
        }
    }

    /// Record a successful probe.
    pub fn mark_connected(&mut self, info: serde_json::Value, at: DateTime<Utc>) {
        self.connected = true;
        self.status = DeviceStatus::Connected;
        self.info = Some(info);
        self.last_connected = Some(at);
        self.error = None;
    }

    /// Record a failed probe. `info` and `last_connected` stay as they were.
    pub fn mark_unreachable(&mut self, error: impl Into<String>) {
        self.connected = false;
        self.status = DeviceStatus::Error;
        self.error = Some(error.into());
    }
}

/// A device annotated with whether it is the active one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceView {
    #[serde(flatten)]
    pub device: Device,
    pub is_active: bool,
}

/// Every device in registry order plus the active pointer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceListing {
    pub devices: Vec<DeviceView>,
    pub active_device_id: Option<DeviceId>,
}

/// Result of probing the active device.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub active_device_id: Option<DeviceId>,
    pub device: Option<Device>,
    pub error: Option<String>,
}
