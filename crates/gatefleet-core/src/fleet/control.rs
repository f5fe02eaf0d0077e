// Passthrough calls to the active device. Responses are forwarded as the
// firmware sent them.

use gatefleet_api::DeviceClient;
use serde_json::Value;

use super::Fleet;
use crate::error::CoreError;

impl Fleet {
    /// Client for the active device, which must be connected.
    async fn active_client(&self) -> Result<DeviceClient, CoreError> {
        let endpoint = {
            let registry = self.inner.registry.lock().await;
            let device = registry.active().ok_or(CoreError::NoActiveDevice)?;
            if !device.connected {
                return Err(CoreError::NotConnected {
                    device_id: device.id.to_string(),
                });
            }
            device.endpoint.clone()
        };
        self.client_for(&endpoint)
    }

    pub async fn active_info(&self) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.info().await?)
    }

    pub async fn active_state(&self) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.state().await?)
    }

    pub async fn active_events(&self) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.events().await?)
    }

    pub async fn last_input(&self, clear: bool) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.last_input(clear).await?)
    }

    pub async fn set_input_mode(&self, mode: &Value) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.set_input_mode(mode).await?)
    }

    pub async fn open_gate(&self) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.open_gate().await?)
    }

    pub async fn set_led(&self, body: &Value) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.set_led(body).await?)
    }

    pub async fn self_test(&self) -> Result<Value, CoreError> {
        Ok(self.active_client().await?.self_test().await?)
    }
}
