// Device control endpoints
//
// Gate, LED, input mode, and diagnostics. Responses are forwarded
// verbatim to callers, so everything is `serde_json::Value`.

use serde_json::json;
use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;

impl DeviceClient {
    /// Current gate/door state. `GET /api/state`
    pub async fn state(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("state")?;
        self.get(url, self.timeouts().control).await
    }

    /// Recent on-device event log. `GET /api/events`
    pub async fn events(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("events")?;
        self.get(url, self.timeouts().control).await
    }

    /// Last card scanned while in input mode.
    ///
    /// `GET /api/input/last`, with `?clear=true` to reset it after reading.
    pub async fn last_input(&self, clear: bool) -> Result<serde_json::Value, Error> {
        let mut url = self.api_url("input/last")?;
        if clear {
            url.query_pairs_mut().append_pair("clear", "true");
        }
        self.get(url, self.timeouts().control).await
    }

    /// Switch the reader between access mode and enrollment input mode.
    ///
    /// `POST /api/input/mode` with `{"mode": ...}`
    pub async fn set_input_mode(
        &self,
        mode: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        let url = self.api_url("input/mode")?;
        debug!(%mode, "setting input mode");
        self.post(url, &json!({ "mode": mode }), self.timeouts().control)
            .await
    }

    /// Open the gate once. `POST /api/open`
    pub async fn open_gate(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("open")?;
        debug!("opening gate");
        self.post(url, &json!({}), self.timeouts().control).await
    }

    /// Drive the status LED. `POST /api/led` with the caller's body.
    pub async fn set_led(&self, body: &serde_json::Value) -> Result<serde_json::Value, Error> {
        let url = self.api_url("led")?;
        self.post(url, body, self.timeouts().control).await
    }

    /// Run the on-device hardware self test. `GET /api/selftest`
    pub async fn self_test(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("selftest")?;
        debug!("running device self test");
        self.get(url, self.timeouts().control).await
    }
}
