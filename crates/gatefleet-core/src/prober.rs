// ── Connection prober ──
//
// Health probe and best-effort clock push for a single device. Neither
// touches the registry; the fleet applies outcomes under its own lock.

use chrono::{DateTime, Utc};
use gatefleet_api::DeviceClient;
use tracing::{debug, warn};

use crate::model::Device;

/// What one `/api/info` probe found.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub connected: bool,
    pub info: Option<serde_json::Value>,
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}

impl ProbeOutcome {
    /// Write the outcome into a device record.
    pub fn apply(&self, device: &mut Device) {
        match (&self.info, &self.error) {
            (Some(info), None) if self.connected => device.mark_connected(info.clone(), self.at),
            _ => device.mark_unreachable(
                self.error
                    .clone()
                    .unwrap_or_else(|| "Device unreachable".to_owned()),
            ),
        }
    }
}

/// Probe a device's info endpoint. Never fails; failures are the outcome.
pub async fn probe(client: &DeviceClient) -> ProbeOutcome {
    let at = Utc::now();
    match client.info().await {
        Ok(info) => {
            debug!(device = %client.base_url(), "probe succeeded");
            ProbeOutcome {
                connected: true,
                info: Some(info),
                error: None,
                at,
            }
        }
        Err(e) => {
            debug!(device = %client.base_url(), error = %e, "probe failed");
            ProbeOutcome {
                connected: false,
                info: None,
                error: Some(e.to_string()),
                at,
            }
        }
    }
}

/// Push the current unix time to a device. Returns whether it was accepted.
pub async fn sync_clock(client: &DeviceClient) -> bool {
    let now = Utc::now().timestamp();
    match client.sync_time(now).await {
        Ok(()) => {
            debug!(device = %client.base_url(), timestamp = now, "clock synced");
            true
        }
        Err(e) => {
            warn!(device = %client.base_url(), error = %e, "clock sync failed");
            false
        }
    }
}
