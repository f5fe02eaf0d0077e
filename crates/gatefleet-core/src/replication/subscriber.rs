// ── Auto-sync subscriber ──
//
// Background task that turns user-store events into fleet-wide pushes,
// one event at a time, so pushes never interleave.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::UserStoreEvent;
use crate::fleet::Fleet;

pub(crate) async fn auto_sync_task(
    fleet: Fleet,
    mut rx: broadcast::Receiver<UserStoreEvent>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "auto-sync fell behind; pushing current snapshot");
                    UserStoreEvent::Resync { missed }
                }
                Err(RecvError::Closed) => break,
            },
        };
        fleet.auto_sync(event).await;
    }
    debug!("auto-sync stopped");
}
