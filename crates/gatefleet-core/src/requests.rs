// ── Typed request structs ──
//
// Inputs to fleet mutations. They deserialize straight from HTTP bodies,
// so field names follow the wire (camelCase, `type`, `in`).

use serde::{Deserialize, Serialize};

use crate::model::UserType;

// ── Devices ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    #[serde(default)]
    pub name: String,
    /// Host, host:port or full URL. `ip` is accepted for older clients.
    #[serde(default, alias = "ip")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Users ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    /// Falls back to `Settings::default_credit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub inside: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustCreditRequest {
    #[serde(default)]
    pub uid: String,
    /// Signed delta; zero is rejected.
    #[serde(default)]
    pub amount: i64,
}

// ── Settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_exit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_credit: Option<i64>,
    #[serde(rename = "adminMode", default, skip_serializing_if = "Option::is_none")]
    pub admin_mode_enabled: Option<bool>,
}

// ── Scans ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordScanRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default, alias = "device_ip", skip_serializing_if = "Option::is_none")]
    pub device_ip: Option<String>,
}
