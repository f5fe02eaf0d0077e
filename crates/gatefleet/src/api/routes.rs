use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Registry and connectivity
    let device_routes = Router::new()
        .route("/api/devices", get(handlers::list_devices))
        .route("/api/devices/add", post(handlers::add_device))
        .route("/api/devices/set-active", post(handlers::set_active))
        .route("/api/devices/:id", delete(handlers::delete_device))
        .route("/api/devices/:id/retry", post(handlers::retry_device))
        .route("/api/devices/:id/sync-time", post(handlers::sync_time))
        .route("/api/connection/status", get(handlers::connection_status));

    // Central database and replication
    let database_routes = Router::new()
        .route("/api/database/users", get(handlers::list_users))
        .route("/api/database/users/add", post(handlers::add_user))
        .route("/api/database/users/update", post(handlers::update_user))
        .route("/api/database/users/:uid", delete(handlers::delete_user))
        .route(
            "/api/database/users/:uid/credit",
            post(handlers::adjust_credit),
        )
        .route(
            "/api/database/settings",
            get(handlers::get_settings).post(handlers::update_settings),
        )
        .route("/api/database/sync/:id", post(handlers::sync_device))
        .route("/api/database/sync-all", post(handlers::sync_all));

    // Audit log, alerts, enrollment scans
    let inbox_routes = Router::new()
        .route(
            "/api/logs/connections",
            get(handlers::list_logs).delete(handlers::clear_logs),
        )
        .route(
            "/api/alerts",
            get(handlers::list_alerts)
                .post(handlers::post_alert)
                .delete(handlers::clear_alerts),
        )
        .route("/api/input/new-uid", post(handlers::record_uid))
        .route("/api/input/pending-uids", get(handlers::pending_uids))
        .route(
            "/api/input/pending-uids/:id",
            delete(handlers::remove_pending_uid),
        );

    // Active-device passthrough
    let control_routes = Router::new()
        .route("/api/esp32/info", get(handlers::device_info))
        .route("/api/esp32/state", get(handlers::device_state))
        .route("/api/esp32/events", get(handlers::device_events))
        .route("/api/esp32/selftest", get(handlers::self_test))
        .route("/api/esp32/input/last", get(handlers::last_input))
        .route("/api/esp32/input/mode", post(handlers::set_input_mode))
        .route("/api/esp32/open", post(handlers::open_gate))
        .route("/api/esp32/led", post(handlers::set_led));

    Router::new()
        .route("/healthz", get(handlers::health))
        .merge(device_routes)
        .merge(database_routes)
        .merge(inbox_routes)
        .merge(control_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
