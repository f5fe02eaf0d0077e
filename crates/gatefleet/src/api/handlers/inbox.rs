use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::{Map, Value};

use gatefleet_core::{Alert, AuditLogEntry, PendingScan, RecordScanRequest};

use crate::api::AppState;
use crate::api::response::{Ack, ApiError, AppJson, Message, Success};

// ── Types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LogsBody {
    pub logs: Vec<AuditLogEntry>,
}

#[derive(Debug, Serialize)]
pub struct AlertsBody {
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Serialize)]
pub struct AlertBody {
    pub alert: Alert,
}

#[derive(Debug, Serialize)]
pub struct ScanReceived {
    pub message: &'static str,
    pub scan: PendingScan,
}

#[derive(Debug, Serialize)]
pub struct PendingBody {
    pub uids: Vec<PendingScan>,
    pub count: usize,
}

// ── Audit log ───────────────────────────────────────────────────────

pub async fn list_logs(State(state): State<AppState>) -> Json<LogsBody> {
    Json(LogsBody {
        logs: state.fleet.audit_log().await,
    })
}

pub async fn clear_logs(State(state): State<AppState>) -> Json<Success<Ack>> {
    state.fleet.clear_audit_log().await;
    Success::ok(Ack {})
}

// ── Alerts ──────────────────────────────────────────────────────────

pub async fn post_alert(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Map<String, Value>>,
) -> Json<Success<AlertBody>> {
    let alert = state.fleet.record_alert(payload).await;
    Success::ok(AlertBody { alert })
}

pub async fn list_alerts(State(state): State<AppState>) -> Json<AlertsBody> {
    Json(AlertsBody {
        alerts: state.fleet.alerts().await,
    })
}

pub async fn clear_alerts(State(state): State<AppState>) -> Json<Success<Ack>> {
    state.fleet.clear_alerts().await;
    Success::ok(Ack {})
}

// ── Pending scans ───────────────────────────────────────────────────

pub async fn record_uid(
    State(state): State<AppState>,
    AppJson(req): AppJson<RecordScanRequest>,
) -> Result<Json<Success<ScanReceived>>, ApiError> {
    let scan = state.fleet.record_scan(req).await?;
    Ok(Success::ok(ScanReceived {
        message: "UID received",
        scan,
    }))
}

pub async fn pending_uids(State(state): State<AppState>) -> Json<Success<PendingBody>> {
    let uids = state.fleet.pending_scans().await;
    Success::ok(PendingBody {
        count: uids.len(),
        uids,
    })
}

pub async fn remove_pending_uid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<Message>>, ApiError> {
    let id: u64 = id
        .parse()
        .map_err(|_| ApiError::not_found("UID not found"))?;
    state.fleet.remove_scan(id).await?;
    Ok(Success::ok(Message::new("UID removed from pending list")))
}
