// Device registry operations: register, list, switch, delete, retry,
// probe the active device, and clock sync.

use gatefleet_api::DeviceClient;
use tracing::{debug, info};

use super::Fleet;
use crate::error::CoreError;
use crate::model::{
    AuditAction, AuditStatus, ConnectionStatus, Device, DeviceId, DeviceListing, Endpoint,
};
use crate::prober::{self, ProbeOutcome};
use crate::replication::PushReason;
use crate::requests::RegisterDeviceRequest;

const NO_ACTIVE_DEVICE: &str = "No active device";

impl Fleet {
    /// Every device in registration order, with the active one marked.
    pub async fn devices(&self) -> DeviceListing {
        self.inner.registry.lock().await.listing()
    }

    pub async fn device(&self, id: &DeviceId) -> Result<Device, CoreError> {
        self.inner.registry.lock().await.require(id).cloned()
    }

    pub async fn active_device(&self) -> Option<Device> {
        self.inner.registry.lock().await.active().cloned()
    }

    /// Register a device, probing it before it is stored.
    ///
    /// An unreachable device is still registered, with status `error`.
    /// A reachable one gets its clock set and the current database pushed.
    pub async fn register(&self, req: RegisterDeviceRequest) -> Result<Device, CoreError> {
        let name = req.name.trim().to_owned();
        if name.is_empty() || req.endpoint.trim().is_empty() {
            return Err(CoreError::validation("Name and endpoint are required"));
        }
        let endpoint = Endpoint::parse(&req.endpoint)?;
        // Held until insert so a concurrent registration of the same
        // endpoint fails here, before either touches the device.
        self.inner.registry.lock().await.reserve(&endpoint)?;

        let registered = self
            .register_reserved(name, endpoint.clone(), req.location, req.description)
            .await;
        if registered.is_err() {
            self.inner.registry.lock().await.release(&endpoint);
        }
        let (device, client) = registered?;

        if device.connected {
            self.record(
                &device.id,
                AuditAction::Add,
                AuditStatus::Success,
                format!("Device \"{}\" added and connected", device.name),
            )
            .await;
            if let Err(e) = self
                .push_and_record(&device.id, &device.name, &client, PushReason::NewDevice)
                .await
            {
                debug!(error = %e, "initial push failed");
            }
        } else {
            self.record(
                &device.id,
                AuditAction::Add,
                AuditStatus::Warning,
                format!(
                    "Device \"{}\" added but not connected: {}",
                    device.name,
                    device.error.as_deref().unwrap_or("unknown error")
                ),
            )
            .await;
        }

        info!(
            id = %device.id,
            endpoint = %device.endpoint,
            connected = device.connected,
            "device registered"
        );
        Ok(device)
    }

    /// Probe, clock-sync and insert a device whose endpoint is reserved.
    async fn register_reserved(
        &self,
        name: String,
        endpoint: Endpoint,
        location: Option<String>,
        description: Option<String>,
    ) -> Result<(Device, DeviceClient), CoreError> {
        let mut device = Device::new(DeviceId::generate(), name, endpoint, location, description);
        let client = self.client_for(&device.endpoint)?;

        prober::probe(&client).await.apply(&mut device);
        if device.connected {
            prober::sync_clock(&client).await;
        }

        let mut registry = self.inner.registry.lock().await;
        registry.insert(device.clone())?;
        self.persist_devices(&registry).await?;
        Ok((device, client))
    }

    /// Make `id` the active device.
    pub async fn set_active(&self, id: &DeviceId) -> Result<Device, CoreError> {
        let device = {
            let mut registry = self.inner.registry.lock().await;
            let device = registry.set_active(id)?.clone();
            self.persist_devices(&registry).await?;
            device
        };

        self.record(
            id,
            AuditAction::Switch,
            AuditStatus::Info,
            format!("Switched to device \"{}\"", device.name),
        )
        .await;
        Ok(device)
    }

    /// Remove a device. Returns the active id afterwards.
    pub async fn remove_device(&self, id: &DeviceId) -> Result<Option<DeviceId>, CoreError> {
        let (removed, active) = {
            let mut registry = self.inner.registry.lock().await;
            let outcome = registry.remove(id)?;
            self.persist_devices(&registry).await?;
            outcome
        };

        self.record(
            id,
            AuditAction::Delete,
            AuditStatus::Info,
            format!("Device \"{}\" removed", removed.name),
        )
        .await;
        Ok(active)
    }

    /// Re-probe a device. On success the clock is set and the database
    /// pushed to it (not to the rest of the fleet).
    ///
    /// Returns the updated device either way; check `connected`.
    pub async fn retry(&self, id: &DeviceId) -> Result<Device, CoreError> {
        let (endpoint, name) = {
            let registry = self.inner.registry.lock().await;
            let device = registry.require(id)?;
            (device.endpoint.clone(), device.name.clone())
        };
        let client = self.client_for(&endpoint)?;

        let outcome = prober::probe(&client).await;
        let device = self.apply_probe(id, &outcome).await?;

        if device.connected {
            prober::sync_clock(&client).await;
            // Outcome is audited by push_and_record.
            let _ = self
                .push_and_record(id, &name, &client, PushReason::Reconnect)
                .await;
            self.record(
                id,
                AuditAction::Retry,
                AuditStatus::Success,
                format!("Reconnected to \"{name}\""),
            )
            .await;
        } else {
            self.record(
                id,
                AuditAction::Retry,
                AuditStatus::Failed,
                format!(
                    "Failed to reconnect to \"{name}\": {}",
                    device.error.as_deref().unwrap_or("unknown error")
                ),
            )
            .await;
        }
        Ok(device)
    }

    /// Probe the active device and report what was found.
    pub async fn check_active(&self) -> Result<ConnectionStatus, CoreError> {
        let active = {
            let registry = self.inner.registry.lock().await;
            registry.active().map(|d| (d.id.clone(), d.endpoint.clone()))
        };
        let Some((id, endpoint)) = active else {
            return Ok(ConnectionStatus {
                connected: false,
                active_device_id: None,
                device: None,
                error: Some(NO_ACTIVE_DEVICE.to_owned()),
            });
        };

        let client = self.client_for(&endpoint)?;
        let outcome = prober::probe(&client).await;
        let device = self.apply_probe(&id, &outcome).await?;

        Ok(ConnectionStatus {
            connected: device.connected,
            error: device.error.clone(),
            active_device_id: Some(id),
            device: Some(device),
        })
    }

    /// Push the control point's clock to a connected device.
    ///
    /// Returns whether the device accepted it.
    pub async fn sync_time(&self, id: &DeviceId) -> Result<bool, CoreError> {
        let (endpoint, name) = {
            let registry = self.inner.registry.lock().await;
            let device = registry.require(id)?;
            if !device.connected {
                return Err(CoreError::NotConnected {
                    device_id: id.to_string(),
                });
            }
            (device.endpoint.clone(), device.name.clone())
        };

        let client = self.client_for(&endpoint)?;
        let ok = prober::sync_clock(&client).await;
        let (status, message) = if ok {
            (AuditStatus::Success, format!("Time synced on \"{name}\""))
        } else {
            (AuditStatus::Failed, format!("Time sync failed on \"{name}\""))
        };
        self.record(id, AuditAction::TimeSync, status, message).await;
        Ok(ok)
    }

    /// Apply a probe outcome to a device that may have been removed
    /// while the probe was in flight.
    async fn apply_probe(
        &self,
        id: &DeviceId,
        outcome: &ProbeOutcome,
    ) -> Result<Device, CoreError> {
        let mut registry = self.inner.registry.lock().await;
        let device = registry
            .get_mut(id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_string(),
            })?;
        outcome.apply(device);
        let device = device.clone();
        self.persist_devices(&registry).await?;
        Ok(device)
    }
}
