use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::errors::log_error;
use xsm_core::process::SystemProcessTable;
use xsm_core::restore::{RestoreReconciler, RestoreReport};
use xsm_core::workspace::GnomeWorkspaces;

use super::helpers::{
    filter_pipeline, load_config_with_warning, session_name, session_store, window_manager,
};
use crate::{color, table};

pub(crate) fn handle_restore_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    let interval = matches.get_one::<f64>("interval").copied();
    info!(event = "cli.restore_started", session = %name, interval = ?interval);

    let config = load_config_with_warning();
    let store = session_store(&config);

    let session = match store.load(&name) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ {}", e)));
            error!(event = "cli.restore_failed", session = %name, error = %e);
            log_error(&e);
            return Err(e.into());
        }
    };

    let mut settings = config.restore_settings()?;
    if let Some(secs) = interval {
        settings.launch_interval = Duration::try_from_secs_f64(secs).map_err(|_| {
            format!("--interval must be a non-negative number of seconds (got {})", secs)
        })?;
    }

    let windows = window_manager().inspect_err(|e| {
        eprintln!("{}", color::error(&format!("❌ {}", e)));
        log_error(e);
    })?;
    let reconciler =
        RestoreReconciler::new(windows, Arc::new(SystemProcessTable), Arc::new(GnomeWorkspaces))
            .with_filters(filter_pipeline(matches, &config))
            .with_settings(settings);

    println!(
        "Restoring session {} ({} window(s))...",
        color::accent(&name),
        session.window_records.len()
    );

    let report = match reconciler.spawn_detached(session).and_then(|restore| restore.join()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ Restore failed: {}", e)));
            error!(event = "cli.restore_failed", session = %name, error = %e);
            log_error(&e);
            return Err(e.into());
        }
    };

    print_report(&report);
    info!(
        event = "cli.restore_completed",
        session = %name,
        launched = report.launched(),
        placed = report.placed()
    );
    Ok(())
}

/// Summary shared by `restore` and `move`.
pub(crate) fn print_report(report: &RestoreReport) {
    if report.considered == 0 {
        println!("Nothing to restore.");
        return;
    }

    if !report.moves.is_empty() {
        table::print_moves_table(&report.moves);
    }

    for record in &report.unrestorable {
        eprintln!(
            "{}",
            color::warning(&format!(
                "⚠️  Skipped '{}': no command line recorded",
                record.window_title
            ))
        );
    }
    for failure in &report.launch_failures {
        eprintln!(
            "{}",
            color::warning(&format!(
                "⚠️  Could not launch '{}': {}",
                failure.record.application_name, failure.error
            ))
        );
    }
    if let Some(message) = &report.workspace_error {
        eprintln!(
            "{}",
            color::warning(&format!("⚠️  Workspaces were not adjusted: {}", message))
        );
    }

    let summary = format!(
        "{} of {} window(s) in place",
        report.placed(),
        report.moves.len()
    );
    if report.is_complete() {
        println!("✅ {}", color::success(&summary));
    } else {
        println!("{}", color::caution(&summary));
    }
}
