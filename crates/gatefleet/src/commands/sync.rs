//! Manual database replication.

use tabled::Tabled;

use gatefleet_core::{DeviceId, Fleet, SyncResult};

use crate::cli::{GlobalOpts, SyncArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SyncRow {
    #[tabled(rename = "Device")]
    device_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Result")]
    outcome: String,
    #[tabled(rename = "Error")]
    error: String,
}

pub async fn handle(fleet: &Fleet, args: SyncArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(id) = args.id.filter(|_| !args.all) {
        let id = DeviceId::from(id);
        let users = fleet.push_to(&id).await?;
        if !global.quiet {
            eprintln!("Database synced to {id} ({users} users)");
        }
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let results = fleet.push_to_all().await;
    let out = output::render_list(
        &global.output,
        &results,
        |r: &SyncResult| SyncRow {
            device_id: r.device_id.to_string(),
            name: r.name.clone(),
            outcome: output::paint_outcome(r.success, color),
            error: r.error.clone().unwrap_or_default(),
        },
        |r| format!("{}\t{}", r.device_id, if r.success { "ok" } else { "failed" }),
    );
    output::print_output(&out, global.quiet);

    if !global.quiet {
        let synced = results.iter().filter(|r| r.success).count();
        eprintln!("Synced to {synced} out of {} devices", results.len());
    }
    Ok(())
}
