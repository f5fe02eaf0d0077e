//! Configuration for the gatefleet control point.
//!
//! One TOML file plus `GATEFLEET_`-prefixed environment variables, merged
//! with figment and translated into `gatefleet_core::FleetConfig`. The
//! binary layers its own flags (`--data-dir`, `--bind`) on top.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatefleet_api::RequestTimeouts;
use gatefleet_core::FleetConfig;
use gatefleet_core::config::{DEFAULT_ALERT_CAPACITY, DEFAULT_AUDIT_CAPACITY, DEFAULT_SCAN_CAPACITY};

const ENV_PREFIX: &str = "GATEFLEET_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Snapshot directory. Unset means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Listen address for `serve`.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Accept self-signed certificates on `https://` devices.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default)]
    pub timeouts: Timeouts,

    #[serde(default)]
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            bind: default_bind(),
            log_format: default_log_format(),
            accept_invalid_certs: false,
            timeouts: Timeouts::default(),
            limits: Limits::default(),
        }
    }
}

/// Per-request device budgets, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Timeouts {
    #[serde(default = "default_short_secs")]
    pub probe_secs: u64,
    #[serde(default = "default_short_secs")]
    pub time_sync_secs: u64,
    #[serde(default = "default_push_secs")]
    pub push_secs: u64,
    #[serde(default = "default_short_secs")]
    pub control_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            probe_secs: default_short_secs(),
            time_sync_secs: default_short_secs(),
            push_secs: default_push_secs(),
            control_secs: default_short_secs(),
        }
    }
}

/// Capacities of the in-memory inbox logs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Limits {
    #[serde(default = "default_audit_log")]
    pub audit_log: usize,
    #[serde(default = "default_alerts")]
    pub alerts: usize,
    #[serde(default = "default_pending_scans")]
    pub pending_scans: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            audit_log: default_audit_log(),
            alerts: default_alerts(),
            pending_scans: default_pending_scans(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".into()
}
fn default_log_format() -> String {
    "text".into()
}
fn default_short_secs() -> u64 {
    3
}
fn default_push_secs() -> u64 {
    5
}
fn default_audit_log() -> usize {
    DEFAULT_AUDIT_CAPACITY
}
fn default_alerts() -> usize {
    DEFAULT_ALERT_CAPACITY
}
fn default_pending_scans() -> usize {
    DEFAULT_SCAN_CAPACITY
}

// ── Validation and translation ──────────────────────────────────────

impl Config {
    /// Reject values the fleet cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(invalid(
                "log_format",
                format!("expected 'text' or 'json', got '{}'", self.log_format),
            ));
        }

        let t = &self.timeouts;
        for (field, secs) in [
            ("timeouts.probe_secs", t.probe_secs),
            ("timeouts.time_sync_secs", t.time_sync_secs),
            ("timeouts.push_secs", t.push_secs),
            ("timeouts.control_secs", t.control_secs),
        ] {
            if secs == 0 {
                return Err(invalid(field, "must be at least 1 second"));
            }
        }

        let l = &self.limits;
        for (field, cap) in [
            ("limits.audit_log", l.audit_log),
            ("limits.alerts", l.alerts),
            ("limits.pending_scans", l.pending_scans),
        ] {
            if cap == 0 {
                return Err(invalid(field, "must be at least 1"));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| invalid("bind", format!("'{}': {e}", self.bind)))
    }

    /// Effective snapshot directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Build the core configuration, validating first.
    pub fn to_fleet_config(&self) -> Result<FleetConfig, ConfigError> {
        self.validate()?;
        let t = &self.timeouts;
        Ok(FleetConfig {
            data_dir: self.resolved_data_dir(),
            timeouts: RequestTimeouts {
                probe: Duration::from_secs(t.probe_secs),
                time_sync: Duration::from_secs(t.time_sync_secs),
                push: Duration::from_secs(t.push_secs),
                control: Duration::from_secs(t.control_secs),
            },
            accept_invalid_certs: self.accept_invalid_certs,
            audit_capacity: self.limits.audit_log,
            alert_capacity: self.limits.alerts,
            scan_capacity: self.limits.pending_scans,
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "gatefleet", "gatefleet")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where snapshots live when `data_dir` is not configured.
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("database"),
        |dirs| dirs.data_dir().join("database"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gatefleet");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing is fine) plus environment.
///
/// Nested keys use a double underscore: `GATEFLEET_TIMEOUTS__PUSH_SECS`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
