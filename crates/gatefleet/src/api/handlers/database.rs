use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use gatefleet_core::{
    AdjustCreditRequest, CentralUser, CreateUserRequest, DeviceId, Settings, SyncResult,
    UpdateSettingsRequest, UpdateUserRequest,
};

use crate::api::AppState;
use crate::api::response::{ApiError, AppJson, Message, Success};

// ── Types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UsersBody {
    pub users: Vec<CentralUser>,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: CentralUser,
}

#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    #[serde(default)]
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct SettingsBody {
    pub settings: Settings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncDeviceResponse {
    pub message: String,
    pub synced_users: usize,
}

#[derive(Debug, Serialize)]
pub struct SyncAllResponse {
    pub message: String,
    pub results: Vec<SyncResult>,
}

// ── Users ───────────────────────────────────────────────────────────

pub async fn list_users(State(state): State<AppState>) -> Json<Success<UsersBody>> {
    Success::ok(UsersBody {
        users: state.fleet.users().await,
    })
}

pub async fn add_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> Result<Json<Success<UserBody>>, ApiError> {
    let user = state.fleet.add_user(req).await?;
    Ok(Success::ok(UserBody { user }))
}

pub async fn update_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> Result<Json<Success<UserBody>>, ApiError> {
    let user = state.fleet.update_user(req).await?;
    Ok(Success::ok(UserBody { user }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Success<Message>>, ApiError> {
    state.fleet.remove_user(&uid).await?;
    Ok(Success::ok(Message::new("User deleted")))
}

pub async fn adjust_credit(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    AppJson(req): AppJson<CreditRequest>,
) -> Result<Json<Success<UserBody>>, ApiError> {
    let user = state
        .fleet
        .adjust_credit(AdjustCreditRequest {
            uid,
            amount: req.amount,
        })
        .await?;
    Ok(Success::ok(UserBody { user }))
}

// ── Settings ────────────────────────────────────────────────────────

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.fleet.settings().await)
}

pub async fn update_settings(
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateSettingsRequest>,
) -> Result<Json<Success<SettingsBody>>, ApiError> {
    let settings = state.fleet.update_settings(req).await?;
    Ok(Success::ok(SettingsBody { settings }))
}

// ── Replication ─────────────────────────────────────────────────────

pub async fn sync_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<SyncDeviceResponse>>, ApiError> {
    let synced_users = state.fleet.push_to(&DeviceId::from(id)).await?;
    Ok(Success::ok(SyncDeviceResponse {
        message: "Database synced to device".into(),
        synced_users,
    }))
}

pub async fn sync_all(State(state): State<AppState>) -> Json<Success<SyncAllResponse>> {
    let results = state.fleet.push_to_all().await;
    let synced = results.iter().filter(|r| r.success).count();
    Success::ok(SyncAllResponse {
        message: format!("Synced to {synced} out of {} devices", results.len()),
        results,
    })
}
