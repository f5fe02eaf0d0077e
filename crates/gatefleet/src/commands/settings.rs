use gatefleet_core::{Fleet, Settings, UpdateSettingsRequest};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

fn detail(s: &Settings) -> String {
    [
        format!("Cost per exit:  {}", s.cost_per_exit),
        format!("Default credit: {}", s.default_credit),
        format!(
            "Admin mode:     {}",
            if s.admin_mode_enabled { "on" } else { "off" }
        ),
    ]
    .join("\n")
}

pub async fn handle(
    fleet: &Fleet,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let settings = match args.command {
        SettingsCommand::Show => fleet.settings().await,
        SettingsCommand::Set {
            cost_per_exit,
            default_credit,
            admin_mode,
        } => {
            fleet
                .update_settings(UpdateSettingsRequest {
                    cost_per_exit,
                    default_credit,
                    admin_mode_enabled: admin_mode,
                })
                .await?
        }
    };
    let out = output::render_single(&global.output, &settings, detail, |s| {
        s.cost_per_exit.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
