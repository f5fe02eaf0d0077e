//! Command dispatch: bridges CLI args -> fleet operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod serve;
pub mod settings;
pub mod sync;
pub mod users;
pub mod util;

use gatefleet_core::Fleet;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a fleet-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, fleet: &Fleet, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(fleet, args, global).await,
        Command::Users(args) => users::handle(fleet, args, global).await,
        Command::Settings(args) => settings::handle(fleet, args, global).await,
        Command::Sync(args) => sync::handle(fleet, args, global).await,
        // Handled before the fleet is opened
        Command::Serve(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
