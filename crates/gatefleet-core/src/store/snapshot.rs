// ── On-disk snapshots ──
//
// Three pretty-printed JSON documents in one data directory. Writes go
// to a sibling temp file first and are renamed into place, so a crash
// mid-write leaves the previous snapshot intact.
//
// Saves are async: the document is encoded on the caller and the file
// work runs on tokio's blocking pool, so an fsync never stalls a runtime
// worker. Callers await the save while holding their collection lock,
// which keeps writes to one file in order.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{CentralUser, Device, DeviceId, Settings};

pub const DEVICES_FILE: &str = "devices.json";
pub const USERS_FILE: &str = "users.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// `devices.json`: the registry and its active pointer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesDocument {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub active_device_id: Option<DeviceId>,
}

/// `users.json`: the central user database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersDocument {
    #[serde(default)]
    pub users: Vec<CentralUser>,
}

/// File-backed persistence for one control point.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open `dir`, creating it and any missing document with defaults.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let store = Self { dir: dir.into() };
        fs::create_dir_all(&store.dir).map_err(|e| persistence(&store.dir, &e))?;

        store.init_file(DEVICES_FILE, &DevicesDocument::default())?;
        store.init_file(USERS_FILE, &UsersDocument::default())?;
        store.init_file(SETTINGS_FILE, &Settings::default())?;

        debug!(dir = %store.dir.display(), "snapshot store ready");
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_devices(&self) -> Result<DevicesDocument, CoreError> {
        self.read(DEVICES_FILE)
    }

    pub async fn save_devices(&self, doc: &DevicesDocument) -> Result<(), CoreError> {
        self.save(DEVICES_FILE, doc).await
    }

    pub fn load_users(&self) -> Result<UsersDocument, CoreError> {
        self.read(USERS_FILE)
    }

    pub async fn save_users(&self, doc: &UsersDocument) -> Result<(), CoreError> {
        self.save(USERS_FILE, doc).await
    }

    pub fn load_settings(&self) -> Result<Settings, CoreError> {
        self.read(SETTINGS_FILE)
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        self.save(SETTINGS_FILE, settings).await
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn init_file<T: Serialize>(&self, name: &str, default: &T) -> Result<(), CoreError> {
        if self.dir.join(name).exists() {
            return Ok(());
        }
        info!(file = name, "initializing snapshot");
        let body = encode(&self.dir.join(name), default)?;
        write_file(&self.dir, name, &body)
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, CoreError> {
        let path = self.dir.join(name);
        let raw = fs::read_to_string(&path).map_err(|e| persistence(&path, &e))?;
        serde_json::from_str(&raw).map_err(|e| persistence(&path, &e))
    }

    async fn save<T: Serialize>(&self, name: &'static str, value: &T) -> Result<(), CoreError> {
        let path = self.dir.join(name);
        let body = encode(&path, value)?;
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || write_file(&dir, name, &body))
            .await
            .map_err(|e| persistence(&path, &e))?
    }
}

fn encode<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>, CoreError> {
    let mut body = serde_json::to_vec_pretty(value).map_err(|e| persistence(path, &e))?;
    body.push(b'\n');
    Ok(body)
}

/// Write `body` to a temp file in `dir`, then rename it over `name`.
fn write_file(dir: &Path, name: &str, body: &[u8]) -> Result<(), CoreError> {
    let path = dir.join(name);
    let tmp = dir.join(format!(".{name}.tmp"));

    let mut file = fs::File::create(&tmp).map_err(|e| persistence(&tmp, &e))?;
    file.write_all(body).map_err(|e| persistence(&tmp, &e))?;
    file.sync_all().map_err(|e| persistence(&tmp, &e))?;
    drop(file);

    fs::rename(&tmp, &path).map_err(|e| persistence(&path, &e))?;
    debug!(file = name, bytes = body.len(), "snapshot written");
    Ok(())
}

fn persistence(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::Persistence {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
