use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::errors::log_error;
use xsm_core::process::SystemProcessTable;
use xsm_core::snapshot::capture_filtered;

use super::helpers::{
    filter_pipeline, load_config_with_warning, session_name, session_store, window_manager,
};
use crate::color;

pub(crate) fn handle_save_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    info!(event = "cli.save_started", session = %name);

    let config = load_config_with_warning();
    let store = session_store(&config);
    let filters = filter_pipeline(matches, &config);

    let windows = window_manager().inspect_err(|e| {
        eprintln!("{}", color::error(&format!("❌ {}", e)));
        log_error(e);
    })?;

    let snapshot = match capture_filtered(windows.as_ref(), &SystemProcessTable, false, &filters) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ {}", e)));
            error!(event = "cli.save_failed", session = %name, error = %e);
            log_error(&e);
            return Err(e.into());
        }
    };

    if snapshot.is_empty() {
        let existing = store.session_path(&name).is_ok_and(|path| path.exists());
        println!("{}", empty_capture_message(&name, existing));
        info!(event = "cli.save_completed_empty", session = %name, existing = existing);
        return Ok(());
    }

    match store.save(&name, snapshot) {
        Ok(saved) => {
            println!(
                "✅ Saved session {} with {} window(s)",
                color::accent(&name),
                saved.config.window_records.len()
            );
            println!("   Path: {}", color::muted(&saved.path.display().to_string()));
            if let Some(backup) = &saved.backup_path {
                println!(
                    "   Previous session backed up to {}",
                    color::muted(&backup.display().to_string())
                );
            }
            info!(
                event = "cli.save_completed",
                session = %name,
                windows = saved.config.window_records.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ Failed to save session: {}", e)));
            error!(event = "cli.save_failed", session = %name, error = %e);
            log_error(&e);
            Err(e.into())
        }
    }
}

/// Nothing was captured, so nothing is written and no backup is taken.
fn empty_capture_message(name: &str, existing: bool) -> String {
    if existing {
        format!(
            "No windows to save. Existing session {} was left untouched.",
            color::accent(name)
        )
    } else {
        format!("No windows to save. Session {} was not created.", color::accent(name))
    }
}
