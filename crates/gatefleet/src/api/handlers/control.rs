// Active-device passthrough. Device answers are returned verbatim.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;

use crate::api::AppState;
use crate::api::response::{ApiError, AppJson};

type Passthrough = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct LastInputQuery {
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Deserialize)]
pub struct InputModeRequest {
    #[serde(default)]
    pub mode: Value,
}

pub async fn device_info(State(state): State<AppState>) -> Passthrough {
    state
        .fleet
        .active_info()
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}

pub async fn device_state(State(state): State<AppState>) -> Passthrough {
    state
        .fleet
        .active_state()
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}

pub async fn device_events(State(state): State<AppState>) -> Passthrough {
    state
        .fleet
        .active_events()
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}

pub async fn self_test(State(state): State<AppState>) -> Passthrough {
    state
        .fleet
        .self_test()
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}

pub async fn last_input(
    State(state): State<AppState>,
    Query(query): Query<LastInputQuery>,
) -> Passthrough {
    state
        .fleet
        .last_input(query.clear)
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}

pub async fn set_input_mode(
    State(state): State<AppState>,
    AppJson(req): AppJson<InputModeRequest>,
) -> Passthrough {
    state
        .fleet
        .set_input_mode(&req.mode)
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}

pub async fn open_gate(State(state): State<AppState>) -> Passthrough {
    state
        .fleet
        .open_gate()
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}

pub async fn set_led(State(state): State<AppState>, AppJson(body): AppJson<Value>) -> Passthrough {
    state
        .fleet
        .set_led(&body)
        .await
        .map(Json)
        .map_err(ApiError::from_control)
}
