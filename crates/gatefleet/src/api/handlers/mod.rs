mod control;
mod database;
mod devices;
mod inbox;

use axum::Json;
use serde::Serialize;

pub use control::{
    device_events, device_info, device_state, last_input, open_gate, self_test, set_input_mode,
    set_led,
};
pub use database::{
    add_user, adjust_credit, delete_user, get_settings, list_users, sync_all, sync_device,
    update_settings, update_user,
};
pub use devices::{
    add_device, connection_status, delete_device, list_devices, retry_device, set_active,
    sync_time,
};
pub use inbox::{
    clear_alerts, clear_logs, list_alerts, list_logs, pending_uids, post_alert, record_uid,
    remove_pending_uid,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
