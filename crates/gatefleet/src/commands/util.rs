//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};

use gatefleet_core::{AutoSyncReport, Fleet};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Headroom on top of the push timeout while waiting for a report.
const REPORT_GRACE: Duration = Duration::from_secs(2);

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Wait for the auto-sync report of the change just made and summarize it
/// on stderr. The receiver must be subscribed before the mutation.
pub async fn await_replication(
    fleet: &Fleet,
    reports: &mut broadcast::Receiver<std::sync::Arc<AutoSyncReport>>,
    global: &GlobalOpts,
) {
    let budget = fleet.config().timeouts.push + REPORT_GRACE;
    let report = match tokio::time::timeout(budget, reports.recv()).await {
        Ok(Ok(report)) => report,
        Ok(Err(RecvError::Lagged(_) | RecvError::Closed)) | Err(_) => {
            tracing::warn!("no replication report; devices may be out of date");
            return;
        }
    };

    if global.quiet || report.results.is_empty() {
        return;
    }
    let color = output::should_color(&global.color);
    eprintln!(
        "Replicated to {} of {} devices",
        report.synced(),
        report.results.len()
    );
    for result in &report.results {
        eprintln!(
            "  {:<24} {}{}",
            result.name,
            output::paint_outcome(result.success, color),
            result
                .error
                .as_deref()
                .map(|e| format!(" ({e})"))
                .unwrap_or_default()
        );
    }
}
