//! REST API over a [`Fleet`].
//!
//! Every mutating route answers `{"success": true, ...}`; failures answer
//! `{"success": false, "error": "..."}` with a 4xx/5xx status.

pub mod handlers;
pub mod response;
mod routes;

use std::net::SocketAddr;

use gatefleet_core::Fleet;
use tracing::info;

pub use response::ApiError;
pub use routes::create_router;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub fleet: Fleet,
}

impl AppState {
    pub fn new(fleet: Fleet) -> Self {
        Self { fleet }
    }
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM, then stop the fleet's
/// background tasks.
pub async fn serve(fleet: Fleet, addr: SocketAddr) -> std::io::Result<()> {
    fleet.start().await;

    let app = create_router(AppState::new(fleet.clone()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("shutting down");
    fleet.shutdown().await;
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
