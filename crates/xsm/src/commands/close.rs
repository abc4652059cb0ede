use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::close::{DEFAULT_CLOSE_PAUSE, close_windows};
use xsm_core::errors::log_error;
use xsm_core::process::SystemProcessTable;

use super::helpers::{filter_pipeline, load_config_with_warning, window_manager};
use crate::color;

pub(crate) fn handle_close_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.close_started");

    let config = load_config_with_warning();
    let filters = filter_pipeline(matches, &config);
    let windows = window_manager().inspect_err(|e| {
        eprintln!("{}", color::error(&format!("❌ {}", e)));
        log_error(e);
    })?;

    match close_windows(
        windows.as_ref(),
        &SystemProcessTable,
        &filters,
        DEFAULT_CLOSE_PAUSE,
    ) {
        Ok(report) if report.is_empty() => {
            println!("Nothing to close.");
            info!(event = "cli.close_completed_empty");
            Ok(())
        }
        Ok(report) => {
            println!(
                "✅ Asked {} window(s) of {} application(s) to close",
                report.closed.len(),
                report.processes
            );
            for (window_id, message) in &report.failures {
                eprintln!(
                    "{}",
                    color::warning(&format!("⚠️  Window {}: {}", window_id, message))
                );
            }
            info!(
                event = "cli.close_completed",
                closed = report.closed.len(),
                failed = report.failures.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ {}", e)));
            error!(event = "cli.close_failed", error = %e);
            log_error(&e);
            Err(e.into())
        }
    }
}
