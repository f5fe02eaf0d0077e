// Health and replication endpoints
//
// The three calls the control point relies on for every device:
// info probe, clock push, and full user database push.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;

impl DeviceClient {
    /// Fetch device health and metadata.
    ///
    /// `GET /api/info` under the probe budget.
    ///
    /// Returns loosely-typed JSON because the field set varies by
    /// firmware version.
    pub async fn info(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("info")?;
        self.get(url, self.timeouts().probe).await
    }

    /// Push the control point's clock to the device.
    ///
    /// `POST /api/time/sync` with `{"timestamp": <unix seconds>}`.
    pub async fn sync_time(&self, timestamp: i64) -> Result<(), Error> {
        let url = self.api_url("time/sync")?;
        debug!(timestamp, "syncing device clock");
        let _: serde_json::Value = self
            .post(url, &json!({ "timestamp": timestamp }), self.timeouts().time_sync)
            .await?;
        Ok(())
    }

    /// Replace the device's user database and settings.
    ///
    /// `POST /api/database/sync` with `{"users": [...], "settings": {...}}`.
    /// The payload is serialized by the caller so this crate stays
    /// independent of the domain model.
    pub async fn sync_database(
        &self,
        payload: &(impl Serialize + Sync),
    ) -> Result<serde_json::Value, Error> {
        let url = self.api_url("database/sync")?;
        debug!(device = %self.base_url(), "pushing user database");
        self.post(url, payload, self.timeouts().push).await
    }
}
