// Central user database, settings, and database replication.
//
// Every committed user mutation publishes a `UserStoreEvent`; the
// auto-sync subscriber calls back into `auto_sync` for each one.

use std::sync::Arc;

use chrono::Utc;
use gatefleet_api::DeviceClient;
use tracing::{debug, info};

use super::Fleet;
use crate::error::CoreError;
use crate::model::{AuditAction, AuditStatus, CentralUser, DeviceId, Settings};
use crate::replication::{
    self, AutoSyncReport, FanOutEntry, PushOutcome, PushReason, PushTarget, Reach, SyncResult,
    UserStoreEvent,
};
use crate::requests::{
    AdjustCreditRequest, CreateUserRequest, UpdateSettingsRequest, UpdateUserRequest,
};
use crate::store::users::apply_settings;

/// How fan-out pushes are labelled in the audit trail.
enum FanOutKind<'a> {
    Manual,
    Auto(&'a UserStoreEvent),
}

impl Fleet {
    // ── Users ────────────────────────────────────────────────────────

    pub async fn users(&self) -> Vec<CentralUser> {
        self.inner.users.lock().await.list()
    }

    pub async fn user(&self, uid: &str) -> Result<CentralUser, CoreError> {
        self.inner
            .users
            .lock()
            .await
            .get(uid)
            .cloned()
            .ok_or_else(|| CoreError::UserNotFound {
                uid: uid.to_owned(),
            })
    }

    /// Add a user. Credit defaults to `Settings::default_credit`.
    pub async fn add_user(&self, req: CreateUserRequest) -> Result<CentralUser, CoreError> {
        let default_credit = self.inner.settings.lock().await.default_credit;
        let user = {
            let mut users = self.inner.users.lock().await;
            let user = users.add(req, default_credit, Utc::now())?;
            self.persist_users(&users).await?;
            user
        };

        info!(uid = %user.uid, "user added");
        self.publish(UserStoreEvent::UserAdded {
            name: user.name.clone(),
        });
        Ok(user)
    }

    pub async fn update_user(&self, req: UpdateUserRequest) -> Result<CentralUser, CoreError> {
        let user = {
            let mut users = self.inner.users.lock().await;
            let user = users.update(req, Utc::now())?;
            self.persist_users(&users).await?;
            user
        };

        info!(uid = %user.uid, "user updated");
        self.publish(UserStoreEvent::UserUpdated {
            name: user.name.clone(),
        });
        Ok(user)
    }

    pub async fn remove_user(&self, uid: &str) -> Result<CentralUser, CoreError> {
        let user = {
            let mut users = self.inner.users.lock().await;
            let user = users.remove(uid)?;
            self.persist_users(&users).await?;
            user
        };

        info!(uid = %user.uid, "user removed");
        self.publish(UserStoreEvent::UserDeleted {
            uid: user.uid.clone(),
        });
        Ok(user)
    }

    /// Add a signed, non-zero delta to a user's credit.
    pub async fn adjust_credit(&self, req: AdjustCreditRequest) -> Result<CentralUser, CoreError> {
        let user = {
            let mut users = self.inner.users.lock().await;
            let user = users.adjust_credit(&req.uid, req.amount, Utc::now())?;
            self.persist_users(&users).await?;
            user
        };

        info!(uid = %user.uid, amount = req.amount, credit = user.credit, "credit adjusted");
        self.publish(UserStoreEvent::CreditUpdated {
            name: user.name.clone(),
            amount: req.amount,
        });
        Ok(user)
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub async fn settings(&self) -> Settings {
        *self.inner.settings.lock().await
    }

    /// Merge and persist a settings change. Devices pick it up on the
    /// next push; no fan-out is triggered.
    pub async fn update_settings(&self, req: UpdateSettingsRequest) -> Result<Settings, CoreError> {
        let mut settings = self.inner.settings.lock().await;
        let mut updated = *settings;
        apply_settings(&mut updated, &req)?;
        self.persist_settings(&updated).await?;
        *settings = updated;
        info!(?updated, "settings updated");
        Ok(updated)
    }

    // ── Replication ──────────────────────────────────────────────────

    /// Push the database to one connected device.
    ///
    /// Returns the number of users sent.
    pub async fn push_to(&self, id: &DeviceId) -> Result<usize, CoreError> {
        let (endpoint, name) = {
            let registry = self.inner.registry.lock().await;
            let device = registry.require(id)?;
            if !device.connected {
                return Err(CoreError::NotConnected {
                    device_id: id.to_string(),
                });
            }
            (device.endpoint.clone(), device.name.clone())
        };
        let client = self.client_for(&endpoint)?;
        self.push_and_record(id, &name, &client, PushReason::Manual)
            .await
    }

    /// Push the database to every device concurrently.
    ///
    /// One result per registered device, in registry order. Disconnected
    /// devices are reported as failures without being contacted.
    pub async fn push_to_all(&self) -> Vec<SyncResult> {
        let entries = self.fan_out(FanOutKind::Manual).await;
        entries.iter().map(FanOutEntry::to_result).collect()
    }

    /// Fan out one user-store event and publish the report.
    pub(crate) async fn auto_sync(&self, event: UserStoreEvent) {
        let entries = self.fan_out(FanOutKind::Auto(&event)).await;
        let report = AutoSyncReport {
            results: entries.iter().map(FanOutEntry::to_result).collect(),
            event,
        };
        info!(
            action = report.event.action(),
            synced = report.synced(),
            devices = report.results.len(),
            "auto-sync finished"
        );
        if self.inner.reports.send(Arc::new(report)).is_err() {
            debug!("no auto-sync observers");
        }
    }

    /// Push to one device and audit the outcome as `DATABASE_SYNC`.
    pub(super) async fn push_and_record(
        &self,
        id: &DeviceId,
        name: &str,
        client: &DeviceClient,
        reason: PushReason,
    ) -> Result<usize, CoreError> {
        let snapshot = self.database_snapshot().await;
        match replication::push_to(client, &snapshot).await {
            Ok(()) => {
                self.record(
                    id,
                    AuditAction::DatabaseSync,
                    AuditStatus::Success,
                    reason.success_message(name),
                )
                .await;
                Ok(snapshot.users.len())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.record(
                    id,
                    AuditAction::DatabaseSync,
                    AuditStatus::Failed,
                    reason.failure_message(name, &err.to_string()),
                )
                .await;
                Err(err)
            }
        }
    }

    async fn fan_out(&self, kind: FanOutKind<'_>) -> Vec<FanOutEntry> {
        let targets = self.push_targets().await;
        if targets.is_empty() {
            debug!("no devices to sync");
            return Vec::new();
        }
        let snapshot = self.database_snapshot().await;
        let entries = replication::fan_out(targets, &snapshot).await;

        for entry in &entries {
            let (status, message) = match (&entry.outcome, &kind) {
                (PushOutcome::NotAttempted, _) => continue,
                (PushOutcome::Pushed, FanOutKind::Manual) => (
                    AuditStatus::Success,
                    PushReason::Manual.success_message(&entry.name),
                ),
                (PushOutcome::Failed(e), FanOutKind::Manual) => (
                    AuditStatus::Failed,
                    PushReason::Manual.failure_message(&entry.name, e),
                ),
                (PushOutcome::Pushed, FanOutKind::Auto(event)) => (
                    AuditStatus::Success,
                    format!("{}: {}", event.action(), event.detail()),
                ),
                (PushOutcome::Failed(e), FanOutKind::Auto(event)) => (
                    AuditStatus::Failed,
                    format!("{} sync failed: {e}", event.action()),
                ),
            };
            let action = match kind {
                FanOutKind::Manual => AuditAction::DatabaseSync,
                FanOutKind::Auto(_) => AuditAction::AutoSync,
            };
            self.record(&entry.device_id, action, status, message).await;
        }
        entries
    }

    async fn push_targets(&self) -> Vec<PushTarget> {
        let registry = self.inner.registry.lock().await;
        registry
            .iter()
            .map(|device| PushTarget {
                device_id: device.id.clone(),
                name: device.name.clone(),
                reach: if device.connected {
                    match self.client_for(&device.endpoint) {
                        Ok(client) => Reach::Ready(client),
                        Err(e) => Reach::Unusable(e.to_string()),
                    }
                } else {
                    Reach::Disconnected
                },
            })
            .collect()
    }
}
