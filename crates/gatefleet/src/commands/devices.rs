//! Device command handlers.

use tabled::Tabled;

use gatefleet_core::{ConnectionStatus, Device, DeviceId, DeviceView, Fleet, RegisterDeviceRequest};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

fn row(view: &DeviceView, color: bool) -> DeviceRow {
    let d = &view.device;
    DeviceRow {
        active: if view.is_active { "*" } else { "" },
        id: d.id.to_string(),
        name: d.name.clone(),
        endpoint: d.endpoint.to_string(),
        location: d.location.clone(),
        status: output::paint_status(d.status, color),
        last_seen: d
            .last_connected
            .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("ID:          {}", d.id),
        format!("Name:        {}", d.name),
        format!("Endpoint:    {}", d.endpoint),
        format!("Location:    {}", d.location),
        format!("Status:      {}", d.status),
        format!("Added:       {}", d.added_at.to_rfc3339()),
        format!(
            "Last Seen:   {}",
            d.last_connected
                .map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
    ];
    if !d.description.is_empty() {
        lines.push(format!("Description: {}", d.description));
    }
    if let Some(ref err) = d.error {
        lines.push(format!("Error:       {err}"));
    }
    if let Some(ref info) = d.info {
        lines.push(format!("Info:        {info}"));
    }
    lines.join("\n")
}

fn status_detail(s: &ConnectionStatus) -> String {
    let mut lines = vec![format!(
        "Connected:   {}",
        if s.connected { "yes" } else { "no" }
    )];
    if let Some(ref d) = s.device {
        lines.push(format!("Device:      {} ({})", d.name, d.id));
        lines.push(format!("Endpoint:    {}", d.endpoint));
    }
    if let Some(ref err) = s.error {
        lines.push(format!("Error:       {err}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(fleet: &Fleet, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let fmt = &global.output;
    let color = output::should_color(&global.color);

    match args.command {
        DevicesCommand::List => {
            let listing = fleet.devices().await;
            let out = output::render_list(
                fmt,
                &listing.devices,
                |v| row(v, color),
                |v| v.device.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let device = fleet.device(&DeviceId::from(id)).await?;
            let out = output::render_single(fmt, &device, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add {
            name,
            endpoint,
            location,
            description,
        } => {
            let device = fleet
                .register(RegisterDeviceRequest {
                    name,
                    endpoint,
                    location,
                    description,
                })
                .await?;
            if !device.connected && !global.quiet {
                eprintln!(
                    "Registered, but the device did not answer: {}",
                    device.error.as_deref().unwrap_or("unknown error")
                );
            }
            let out = output::render_single(fmt, &device, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Remove { id } => {
            let id = DeviceId::from(id);
            let device = fleet.device(&id).await?;
            let prompt = format!("Remove device \"{}\" ({})?", device.name, device.id);
            if !util::confirm("devices remove", &prompt, global.yes)? {
                return Ok(());
            }
            let new_active = fleet.remove_device(&id).await?;
            if !global.quiet {
                match new_active {
                    Some(active) => eprintln!("Removed {id}; active device is now {active}"),
                    None => eprintln!("Removed {id}; no active device"),
                }
            }
            Ok(())
        }

        DevicesCommand::Activate { id } => {
            let device = fleet.set_active(&DeviceId::from(id)).await?;
            let out = output::render_single(fmt, &device, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Retry { id } => {
            let device = fleet.retry(&DeviceId::from(id)).await?;
            let out = output::render_single(fmt, &device, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            if device.connected {
                Ok(())
            } else {
                Err(CliError::Device {
                    message: device
                        .error
                        .unwrap_or_else(|| "device did not answer".into()),
                })
            }
        }

        DevicesCommand::SyncTime { id } => {
            let id = DeviceId::from(id);
            if fleet.sync_time(&id).await? {
                if !global.quiet {
                    eprintln!("Clock synchronized on {id}");
                }
                Ok(())
            } else {
                Err(CliError::Device {
                    message: format!("time sync on {id} failed"),
                })
            }
        }

        DevicesCommand::Status => {
            let status = fleet.check_active().await?;
            let out = output::render_single(fmt, &status, status_detail, |s| {
                s.active_device_id
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
