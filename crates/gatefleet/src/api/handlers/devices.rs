use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use gatefleet_core::{ConnectionStatus, Device, DeviceId, DeviceListing, RegisterDeviceRequest};

use crate::api::AppState;
use crate::api::response::{ApiError, AppJson, Message, Success};

// ── Types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeviceBody {
    pub device: Device,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveResponse {
    pub device_id: DeviceId,
    pub device: Device,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub new_active_device_id: Option<DeviceId>,
}

/// A failed retry still reports the device so callers can show its error.
#[derive(Debug, Serialize)]
pub struct RetryFailure {
    pub success: bool,
    pub error: String,
    pub device: Device,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn add_device(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterDeviceRequest>,
) -> Result<Json<Success<DeviceBody>>, ApiError> {
    let device = state.fleet.register(req).await?;
    Ok(Success::ok(DeviceBody { device }))
}

pub async fn list_devices(State(state): State<AppState>) -> Json<DeviceListing> {
    Json(state.fleet.devices().await)
}

pub async fn set_active(
    State(state): State<AppState>,
    AppJson(req): AppJson<SetActiveRequest>,
) -> Result<Json<Success<SetActiveResponse>>, ApiError> {
    let Some(raw) = req.device_id.filter(|id| !id.trim().is_empty()) else {
        return Err(ApiError::bad_request("Invalid device ID"));
    };
    let device_id = DeviceId::from(raw);
    let device = state.fleet.set_active(&device_id).await?;
    Ok(Success::ok(SetActiveResponse { device_id, device }))
}

pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<DeleteResponse>>, ApiError> {
    let new_active_device_id = state.fleet.remove_device(&DeviceId::from(id)).await?;
    Ok(Success::ok(DeleteResponse {
        new_active_device_id,
    }))
}

pub async fn retry_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let device = state.fleet.retry(&DeviceId::from(id)).await?;
    if device.connected {
        return Ok(Success::ok(DeviceBody { device }).into_response());
    }
    let failure = RetryFailure {
        success: false,
        error: device
            .error
            .clone()
            .unwrap_or_else(|| "Device unreachable".into()),
        device,
    };
    Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response())
}

pub async fn sync_time(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<Message>>, ApiError> {
    if state.fleet.sync_time(&DeviceId::from(id)).await? {
        Ok(Success::ok(Message::new("Time synchronized")))
    } else {
        Err(ApiError::internal("Time sync failed"))
    }
}

pub async fn connection_status(
    State(state): State<AppState>,
) -> Result<Json<ConnectionStatus>, ApiError> {
    Ok(Json(state.fleet.check_active().await?))
}
