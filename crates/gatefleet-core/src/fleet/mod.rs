// ── Fleet facade ──
//
// Owns every piece of control-point state: the device registry, the
// central user database, settings, and the operator inbox. Operations
// are split by concern across the sibling modules; this file holds
// construction, lifecycle and the shared helpers they use.
//
// Locking rules: one tokio mutex per collection, never held across a
// device request. Operations snapshot what they need, release, talk to
// the device, then re-acquire and apply only if the device still exists.
// When more than one lock is needed they are taken in field order.

mod control;
mod database;
mod devices;
mod inbox;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use gatefleet_api::DeviceClient;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::FleetConfig;
use crate::error::CoreError;
use crate::model::{
    Alert, AuditAction, AuditLogEntry, AuditStatus, DeviceId, Endpoint, PendingScan, Settings,
};
use crate::replication::{AutoSyncReport, DatabaseSnapshot, UserStoreEvent, subscriber};
use crate::store::{CappedLog, DeviceRegistry, SnapshotStore, UserStore};

const USER_EVENT_CHANNEL_SIZE: usize = 64;
const REPORT_CHANNEL_SIZE: usize = 64;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<FleetInner>`. Call [`start()`](Self::start)
/// to begin replicating user changes, [`shutdown()`](Self::shutdown) to
/// stop.
#[derive(Clone)]
pub struct Fleet {
    inner: Arc<FleetInner>,
}

struct FleetInner {
    config: FleetConfig,
    snapshots: SnapshotStore,
    http: reqwest::Client,
    registry: Mutex<DeviceRegistry>,
    users: Mutex<UserStore>,
    settings: Mutex<Settings>,
    audit: Mutex<CappedLog<AuditLogEntry>>,
    alerts: Mutex<CappedLog<Alert>>,
    scans: Mutex<CappedLog<PendingScan>>,
    next_entry_id: AtomicU64,
    user_events: broadcast::Sender<UserStoreEvent>,
    user_events_rx: Mutex<Option<broadcast::Receiver<UserStoreEvent>>>,
    reports: broadcast::Sender<Arc<AutoSyncReport>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Fleet {
    /// Load (or initialize) the snapshots under `config.data_dir`.
    ///
    /// Does not start background replication; user changes made before
    /// [`start()`](Self::start) are queued and pushed once it runs.
    pub fn open(config: FleetConfig) -> Result<Self, CoreError> {
        let snapshots = SnapshotStore::open(&config.data_dir)?;
        let registry = DeviceRegistry::from_document(snapshots.load_devices()?);
        let users = UserStore::from_document(snapshots.load_users()?);
        let settings = snapshots.load_settings()?;

        let http = config
            .transport()
            .build_client()
            .map_err(|e| CoreError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        info!(
            dir = %snapshots.dir().display(),
            devices = registry.len(),
            users = users.len(),
            "fleet loaded"
        );

        let (user_events, user_events_rx) = broadcast::channel(USER_EVENT_CHANNEL_SIZE);
        let (reports, _) = broadcast::channel(REPORT_CHANNEL_SIZE);
        let first_id = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();

        Ok(Self {
            inner: Arc::new(FleetInner {
                audit: Mutex::new(CappedLog::new(config.audit_capacity)),
                alerts: Mutex::new(CappedLog::new(config.alert_capacity)),
                scans: Mutex::new(CappedLog::new(config.scan_capacity)),
                config,
                snapshots,
                http,
                registry: Mutex::new(registry),
                users: Mutex::new(users),
                settings: Mutex::new(settings),
                next_entry_id: AtomicU64::new(first_id),
                user_events,
                user_events_rx: Mutex::new(Some(user_events_rx)),
                reports,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &FleetConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the auto-sync subscriber. Calling it twice is a no-op.
    pub async fn start(&self) {
        let Some(rx) = self.inner.user_events_rx.lock().await.take() else {
            debug!("auto-sync already running");
            return;
        };
        let fleet = self.clone();
        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(subscriber::auto_sync_task(fleet, rx, cancel));
        self.inner.task_handles.lock().await.push(handle);
        info!("auto-sync started");
    }

    /// Stop background tasks, letting an in-flight push finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "background task ended abnormally");
            }
        }
        debug!("fleet shut down");
    }

    /// Observe what the auto-sync subscriber does with each user change.
    pub fn sync_reports(&self) -> broadcast::Receiver<Arc<AutoSyncReport>> {
        self.inner.reports.subscribe()
    }

    // ── Shared helpers ───────────────────────────────────────────────

    fn client_for(&self, endpoint: &Endpoint) -> Result<DeviceClient, CoreError> {
        Ok(DeviceClient::with_client(
            self.inner.http.clone(),
            endpoint.url()?,
            self.inner.config.timeouts,
        ))
    }

    fn next_id(&self) -> u64 {
        self.inner.next_entry_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Append to the audit trail and mirror it to the tracing log.
    async fn record(
        &self,
        device_id: &DeviceId,
        action: AuditAction,
        status: AuditStatus,
        message: impl Into<String>,
    ) {
        let entry = AuditLogEntry {
            id: self.next_id(),
            timestamp: Utc::now(),
            device_id: device_id.clone(),
            action,
            status,
            message: message.into(),
        };
        match status {
            AuditStatus::Failed | AuditStatus::Warning => {
                warn!(device = %device_id, %action, %status, "{}", entry.message);
            }
            AuditStatus::Success | AuditStatus::Info => {
                info!(device = %device_id, %action, %status, "{}", entry.message);
            }
        }
        self.inner.audit.lock().await.push(entry);
    }

    async fn persist_devices(&self, registry: &DeviceRegistry) -> Result<(), CoreError> {
        self.inner
            .snapshots
            .save_devices(&registry.to_document())
            .await
            .inspect_err(|e| error!(error = %e, "saving devices failed"))
    }

    async fn persist_users(&self, users: &UserStore) -> Result<(), CoreError> {
        self.inner
            .snapshots
            .save_users(&users.to_document())
            .await
            .inspect_err(|e| error!(error = %e, "saving users failed"))
    }

    async fn persist_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        self.inner
            .snapshots
            .save_settings(settings)
            .await
            .inspect_err(|e| error!(error = %e, "saving settings failed"))
    }

    /// Current users and settings as one push payload.
    async fn database_snapshot(&self) -> DatabaseSnapshot {
        let users = self.inner.users.lock().await.list();
        let settings = *self.inner.settings.lock().await;
        DatabaseSnapshot { users, settings }
    }

    fn publish(&self, event: UserStoreEvent) {
        debug!(action = event.action(), "user store changed");
        if self.inner.user_events.send(event).is_err() {
            debug!("no auto-sync subscriber");
        }
    }
}
