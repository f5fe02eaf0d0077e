// ── Replication engine ──
//
// Pushes the full user database and settings to devices. Targets are
// gathered under the registry lock, then every push runs concurrently
// with the lock released. A failure on one device never aborts the rest.

mod event;
pub(crate) mod subscriber;

pub use event::{AutoSyncReport, SyncResult, UserStoreEvent};

use futures::future::join_all;
use gatefleet_api::DeviceClient;
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{CentralUser, DeviceId, Settings};

pub const NOT_CONNECTED: &str = "Device not connected";

/// The body of a `/api/database/sync` push.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSnapshot {
    pub users: Vec<CentralUser>,
    pub settings: Settings,
}

/// Why a single device is receiving a push; only changes audit wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushReason {
    NewDevice,
    Reconnect,
    Manual,
}

impl PushReason {
    pub fn success_message(self, name: &str) -> String {
        match self {
            Self::NewDevice => format!("Database synced to new device \"{name}\""),
            Self::Reconnect => format!("Database auto-synced on reconnection to \"{name}\""),
            Self::Manual => format!("Database synced to \"{name}\""),
        }
    }

    pub fn failure_message(self, name: &str, error: &str) -> String {
        match self {
            Self::NewDevice => format!("Initial sync to new device \"{name}\" failed: {error}"),
            Self::Reconnect => format!("Auto-sync on reconnection to \"{name}\" failed: {error}"),
            Self::Manual => format!("Failed to sync database to \"{name}\": {error}"),
        }
    }
}

/// How a fan-out should treat one registered device.
#[derive(Debug, Clone)]
pub(crate) enum Reach {
    Ready(DeviceClient),
    Disconnected,
    /// The stored endpoint could not be turned into a client.
    Unusable(String),
}

#[derive(Debug, Clone)]
pub(crate) struct PushTarget {
    pub device_id: DeviceId,
    pub name: String,
    pub reach: Reach,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    Pushed,
    Failed(String),
    NotAttempted,
}

#[derive(Debug, Clone)]
pub(crate) struct FanOutEntry {
    pub device_id: DeviceId,
    pub name: String,
    pub outcome: PushOutcome,
}

impl FanOutEntry {
    pub fn to_result(&self) -> SyncResult {
        let (success, error) = match &self.outcome {
            PushOutcome::Pushed => (true, None),
            PushOutcome::Failed(e) => (false, Some(e.clone())),
            PushOutcome::NotAttempted => (false, Some(NOT_CONNECTED.to_owned())),
        };
        SyncResult {
            device_id: self.device_id.clone(),
            name: self.name.clone(),
            success,
            error,
        }
    }
}

/// Push a snapshot to one device.
pub async fn push_to(
    client: &DeviceClient,
    snapshot: &DatabaseSnapshot,
) -> Result<(), gatefleet_api::Error> {
    client.sync_database(snapshot).await?;
    debug!(
        device = %client.base_url(),
        users = snapshot.users.len(),
        "database pushed"
    );
    Ok(())
}

/// Push a snapshot to every target concurrently.
///
/// Results come back in target order. Disconnected targets are not
/// contacted.
pub(crate) async fn fan_out(
    targets: Vec<PushTarget>,
    snapshot: &DatabaseSnapshot,
) -> Vec<FanOutEntry> {
    let pushes = targets.into_iter().map(|target| async move {
        let outcome = match &target.reach {
            Reach::Ready(client) => match push_to(client, snapshot).await {
                Ok(()) => PushOutcome::Pushed,
                Err(e) => {
                    warn!(device = %target.device_id, error = %e, "database push failed");
                    PushOutcome::Failed(e.to_string())
                }
            },
            Reach::Disconnected => PushOutcome::NotAttempted,
            Reach::Unusable(reason) => PushOutcome::Failed(reason.clone()),
        };
        FanOutEntry {
            device_id: target.device_id,
            name: target.name,
            outcome,
        }
    });

    join_all(pushes).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gatefleet_api::RequestTimeouts;
    use url::Url;

    fn snapshot() -> DatabaseSnapshot {
        DatabaseSnapshot {
            users: Vec::new(),
            settings: Settings::default(),
        }
    }

    #[tokio::test]
    async fn disconnected_and_unusable_targets_are_not_contacted() {
        let targets = vec![
            PushTarget {
                device_id: DeviceId::from("a"),
                name: "A".into(),
                reach: Reach::Disconnected,
            },
            PushTarget {
                device_id: DeviceId::from("b"),
                name: "B".into(),
                reach: Reach::Unusable("bad endpoint".into()),
            },
        ];

        let entries = fan_out(targets, &snapshot()).await;
        let results: Vec<_> = entries.iter().map(FanOutEntry::to_result).collect();

        assert_eq!(results[0].device_id, DeviceId::from("a"));
        assert_eq!(results[0].error.as_deref(), Some(NOT_CONNECTED));
        assert_eq!(results[1].error.as_deref(), Some("bad endpoint"));
        assert!(results.iter().all(|r| !r.success));
    }

    #[tokio::test]
    async fn unreachable_device_is_a_failure_not_an_abort() {
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:1").unwrap(),
            RequestTimeouts::default(),
        );
        let targets = vec![
            PushTarget {
                device_id: DeviceId::from("down"),
                name: "Down".into(),
                reach: Reach::Ready(client),
            },
            PushTarget {
                device_id: DeviceId::from("off"),
                name: "Off".into(),
                reach: Reach::Disconnected,
            },
        ];

        let entries = fan_out(targets, &snapshot()).await;
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0].outcome, PushOutcome::Failed(_)));
        assert_eq!(entries[1].outcome, PushOutcome::NotAttempted);
    }
}
