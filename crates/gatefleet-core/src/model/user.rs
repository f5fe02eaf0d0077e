// ── Central user database types ──
//
// Serialized exactly as the device firmware expects them inside a
// database push: `type` is STATIC/DYNAMIC and the inside flag is `in`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default credit for new users when settings are missing.
pub const DEFAULT_CREDIT: i64 = 100_000;
/// Default cost charged per exit.
pub const DEFAULT_COST_PER_EXIT: i64 = 3000;

/// How a card's credit behaves at the gate.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum UserType {
    /// Never charged.
    Static,
    /// Charged `cost_per_exit` on every exit.
    #[default]
    #[serde(alias = "DYN")]
    #[strum(to_string = "DYNAMIC", serialize = "DYN")]
    Dynamic,
}

/// One card holder in the central database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralUser {
    pub uid: String,
    pub name: String,
    pub credit: i64,
    #[serde(rename = "type", default)]
    pub user_type: UserType,
    /// Whether the holder is currently inside.
    #[serde(rename = "in", default)]
    pub inside: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Pricing and mode settings replicated alongside the users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_cost_per_exit")]
    pub cost_per_exit: i64,
    #[serde(default = "default_credit")]
    pub default_credit: i64,
    #[serde(rename = "adminMode", default)]
    pub admin_mode_enabled: bool,
}

fn default_cost_per_exit() -> i64 {
    DEFAULT_COST_PER_EXIT
}

fn default_credit() -> i64 {
    DEFAULT_CREDIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cost_per_exit: DEFAULT_COST_PER_EXIT,
            default_credit: DEFAULT_CREDIT,
            admin_mode_enabled: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn user_serializes_in_firmware_shape() {
        let user = CentralUser {
            uid: "A1B2".into(),
            name: "Alice".into(),
            credit: 5000,
            user_type: UserType::Static,
            inside: true,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            updated_at: None,
        };
        let v = serde_json::to_value(&user).unwrap();
        assert_eq!(v["type"], "STATIC");
        assert_eq!(v["in"], true);
        assert_eq!(v["createdAt"], "2024-01-01T00:00:00Z");
        assert!(v.get("updatedAt").is_none());
    }

    #[test]
    fn legacy_dyn_type_is_dynamic() {
        let user: CentralUser = serde_json::from_value(json!({
            "uid": "X", "name": "Bob", "credit": 1, "type": "DYN",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.user_type, UserType::Dynamic);
        assert!(!user.inside);
    }

    #[test]
    fn user_type_parses_case_insensitively() {
        assert_eq!("static".parse::<UserType>().unwrap(), UserType::Static);
        assert_eq!("dyn".parse::<UserType>().unwrap(), UserType::Dynamic);
        assert_eq!(UserType::Dynamic.to_string(), "DYNAMIC");
    }

    #[test]
    fn settings_defaults_and_keys() {
        let s = Settings::default();
        let v = serde_json::to_value(s).unwrap();
        assert_eq!(
            v,
            json!({"costPerExit": 3000, "defaultCredit": 100_000, "adminMode": false})
        );

        let partial: Settings = serde_json::from_value(json!({"costPerExit": 10})).unwrap();
        assert_eq!(partial.cost_per_exit, 10);
        assert_eq!(partial.default_credit, DEFAULT_CREDIT);
    }
}
