//! CLI configuration: a thin layer over `gatefleet_config` that applies
//! `GlobalOpts` flag overrides.

use gatefleet_core::FleetConfig;

use crate::cli::{GlobalOpts, LogFormat};
use crate::error::CliError;

pub use gatefleet_config::{Config, config_path, load_config, save_config};

/// Load the config file and environment, then apply `--data-dir`.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    if let Some(dir) = &global.data_dir {
        cfg.data_dir = Some(dir.clone());
    }
    Ok(cfg)
}

/// Core configuration for commands that open the fleet.
pub fn fleet_config(global: &GlobalOpts) -> Result<FleetConfig, CliError> {
    Ok(resolve(global)?.to_fleet_config()?)
}

/// `--log-format` wins over `log_format` in the file. An unreadable config
/// falls back to text so the error itself still gets logged.
pub fn log_format(global: &GlobalOpts) -> LogFormat {
    if let Some(format) = global.log_format {
        return format;
    }
    match load_config() {
        Ok(cfg) if cfg.log_format == "json" => LogFormat::Json,
        _ => LogFormat::Text,
    }
}
