use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::errors::log_error;
use xsm_core::process::SystemProcessTable;
use xsm_core::restore::RestoreReconciler;
use xsm_core::workspace::GnomeWorkspaces;

use super::helpers::{
    filter_pipeline, load_config_with_warning, session_name, session_store, window_manager,
};
use super::restore::print_report;
use crate::color;

pub(crate) fn handle_move_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    info!(event = "cli.move_started", session = %name);

    let config = load_config_with_warning();
    let session = match session_store(&config).load(&name) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ {}", e)));
            error!(event = "cli.move_failed", session = %name, error = %e);
            log_error(&e);
            return Err(e.into());
        }
    };

    let windows = window_manager().inspect_err(|e| {
        eprintln!("{}", color::error(&format!("❌ {}", e)));
        log_error(e);
    })?;
    let reconciler =
        RestoreReconciler::new(windows, Arc::new(SystemProcessTable), Arc::new(GnomeWorkspaces))
            .with_filters(filter_pipeline(matches, &config))
            .with_settings(config.restore_settings()?);

    match reconciler.move_windows(&session) {
        Ok(report) => {
            print_report(&report);
            info!(
                event = "cli.move_completed",
                session = %name,
                placed = report.placed()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ Move failed: {}", e)));
            error!(event = "cli.move_failed", session = %name, error = %e);
            log_error(&e);
            Err(e.into())
        }
    }
}
