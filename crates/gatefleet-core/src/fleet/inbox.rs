// Operator inbox: audit trail, alerts, and card scans awaiting enrollment.
// Memory only; a restart starts all three empty.

use chrono::Utc;
use tracing::{debug, info};

use super::Fleet;
use crate::error::CoreError;
use crate::model::{Alert, AuditLogEntry, PendingScan};
use crate::requests::RecordScanRequest;

impl Fleet {
    // ── Audit log ────────────────────────────────────────────────────

    /// Audit entries, newest first.
    pub async fn audit_log(&self) -> Vec<AuditLogEntry> {
        self.inner.audit.lock().await.snapshot()
    }

    pub async fn clear_audit_log(&self) {
        self.inner.audit.lock().await.clear();
        info!("audit log cleared");
    }

    // ── Alerts ───────────────────────────────────────────────────────

    /// Store an alert. Any `id`/`timestamp` in the payload is replaced.
    pub async fn record_alert(
        &self,
        mut payload: serde_json::Map<String, serde_json::Value>,
    ) -> Alert {
        payload.remove("id");
        payload.remove("timestamp");
        let alert = Alert {
            id: self.next_id(),
            timestamp: Utc::now(),
            payload,
        };
        info!(id = alert.id, "alert received");
        self.inner.alerts.lock().await.push(alert.clone());
        alert
    }

    /// Alerts, newest first.
    pub async fn alerts(&self) -> Vec<Alert> {
        self.inner.alerts.lock().await.snapshot()
    }

    pub async fn clear_alerts(&self) {
        self.inner.alerts.lock().await.clear();
        info!("alerts cleared");
    }

    // ── Pending scans ────────────────────────────────────────────────

    pub async fn record_scan(&self, req: RecordScanRequest) -> Result<PendingScan, CoreError> {
        let uid = req.uid.trim();
        if uid.is_empty() {
            return Err(CoreError::validation("UID is required"));
        }
        let scan = PendingScan {
            id: self.next_id(),
            uid: uid.to_owned(),
            is_new: req.is_new,
            timestamp: Utc::now(),
            device_ip: req.device_ip,
        };
        debug!(uid = %scan.uid, is_new = scan.is_new, "scan queued");
        self.inner.scans.lock().await.push(scan.clone());
        Ok(scan)
    }

    /// Scans, newest first.
    pub async fn pending_scans(&self) -> Vec<PendingScan> {
        self.inner.scans.lock().await.snapshot()
    }

    /// Dismiss a scan by id.
    pub async fn remove_scan(&self, id: u64) -> Result<PendingScan, CoreError> {
        self.inner
            .scans
            .lock()
            .await
            .take_first(|s| s.id == id)
            .ok_or(CoreError::ScanNotFound { id })
    }
}
