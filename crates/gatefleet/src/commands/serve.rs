use gatefleet::api;
use gatefleet_core::Fleet;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::resolve(global)?;
    if let Some(bind) = args.bind {
        cfg.bind = bind;
    }
    let addr = cfg.bind_addr()?;
    let fleet = Fleet::open(cfg.to_fleet_config()?)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %fleet.config().data_dir.display(),
        "gatefleet starting"
    );
    api::serve(fleet, addr).await?;
    Ok(())
}
