// ── Device registry ──
//
// Ordered map of devices plus the active pointer. Pure data: no I/O,
// no locking. The fleet wraps it in a mutex and persists after changes.
//
// Invariants kept here:
//   - endpoints are unique, counting ones reserved by an in-flight
//     registration
//   - the active pointer is `None` or names a registered device
//   - a non-empty registry always has an active device

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use super::snapshot::DevicesDocument;
use crate::error::CoreError;
use crate::model::{Device, DeviceId, DeviceListing, DeviceView, Endpoint};

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: IndexMap<DeviceId, Device>,
    active: Option<DeviceId>,
    reserved: HashSet<Endpoint>,
}

impl DeviceRegistry {
    /// Rebuild from a persisted document, repairing what a hand-edited
    /// or older file might break.
    pub fn from_document(doc: DevicesDocument) -> Self {
        let mut registry = Self::default();
        for device in doc.devices {
            if registry.devices.contains_key(&device.id) {
                warn!(id = %device.id, "dropping duplicate device id from snapshot");
                continue;
            }
            if let Some(existing) = registry.find_by_endpoint(&device.endpoint) {
                warn!(
                    id = %device.id,
                    existing = %existing.id,
                    endpoint = %device.endpoint,
                    "dropping duplicate endpoint from snapshot"
                );
                continue;
            }
            registry.devices.insert(device.id.clone(), device);
        }

        registry.active = doc
            .active_device_id
            .filter(|id| registry.devices.contains_key(id))
            .or_else(|| registry.devices.keys().next().cloned());
        registry
    }

    pub fn to_document(&self) -> DevicesDocument {
        DevicesDocument {
            devices: self.devices.values().cloned().collect(),
            active_device_id: self.active.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn get_mut(&mut self, id: &DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(id)
    }

    /// Look up a device or fail with `DeviceNotFound`.
    pub fn require(&self, id: &DeviceId) -> Result<&Device, CoreError> {
        self.devices.get(id).ok_or_else(|| not_found(id))
    }

    pub fn active_id(&self) -> Option<&DeviceId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&Device> {
        self.active.as_ref().and_then(|id| self.devices.get(id))
    }

    pub fn find_by_endpoint(&self, endpoint: &Endpoint) -> Option<&Device> {
        self.devices.values().find(|d| &d.endpoint == endpoint)
    }

    /// Fail with `DuplicateEndpoint` if `endpoint` is already registered.
    pub fn ensure_unique(&self, endpoint: &Endpoint) -> Result<(), CoreError> {
        match self.find_by_endpoint(endpoint) {
            Some(existing) => Err(CoreError::DuplicateEndpoint {
                endpoint: endpoint.to_string(),
                existing_id: existing.id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Claim `endpoint` for a registration that is about to talk to the
    /// device. Fails if it is registered or already claimed.
    ///
    /// The claim is dropped by [`insert`](Self::insert) or
    /// [`release`](Self::release).
    pub fn reserve(&mut self, endpoint: &Endpoint) -> Result<(), CoreError> {
        self.ensure_unique(endpoint)?;
        if !self.reserved.insert(endpoint.clone()) {
            return Err(CoreError::DuplicateEndpoint {
                endpoint: endpoint.to_string(),
                existing_id: "registration in progress".into(),
            });
        }
        Ok(())
    }

    pub fn release(&mut self, endpoint: &Endpoint) {
        self.reserved.remove(endpoint);
    }

    /// Add a device. The first device into an empty registry becomes active.
    pub fn insert(&mut self, device: Device) -> Result<&Device, CoreError> {
        self.ensure_unique(&device.endpoint)?;
        self.reserved.remove(&device.endpoint);
        if self.devices.contains_key(&device.id) {
            return Err(CoreError::validation(format!(
                "Device id {} already registered",
                device.id
            )));
        }

        let id = device.id.clone();
        if self.active.is_none() {
            self.active = Some(id.clone());
        }
        let (idx, _) = self.devices.insert_full(id, device);
        Ok(&self.devices[idx])
    }

    pub fn set_active(&mut self, id: &DeviceId) -> Result<&Device, CoreError> {
        let device = self.devices.get(id).ok_or_else(|| not_found(id))?;
        self.active = Some(id.clone());
        Ok(device)
    }

    /// Remove a device, moving the active pointer to the first remaining
    /// device if the removed one was active.
    ///
    /// Returns the removed device and the active id afterwards.
    pub fn remove(&mut self, id: &DeviceId) -> Result<(Device, Option<DeviceId>), CoreError> {
        let removed = self.devices.shift_remove(id).ok_or_else(|| not_found(id))?;
        if self.active.as_ref() == Some(id) {
            self.active = self.devices.keys().next().cloned();
        }
        Ok((removed, self.active.clone()))
    }

    /// Devices in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn listing(&self) -> DeviceListing {
        DeviceListing {
            devices: self
                .devices
                .values()
                .map(|d| DeviceView {
                    is_active: self.active.as_ref() == Some(&d.id),
                    device: d.clone(),
                })
                .collect(),
            active_device_id: self.active.clone(),
        }
    }
}

fn not_found(id: &DeviceId) -> CoreError {
    CoreError::DeviceNotFound {
        identifier: id.to_string(),
    }
}
