use tracing::{error, info};

use xsm_core::errors::log_error;

use super::helpers::{load_config_with_warning, session_store};
use crate::{color, table};

pub(crate) fn handle_list_command() -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.list_started");

    let config = load_config_with_warning();
    let store = session_store(&config);

    match store.list() {
        Ok(sessions) if sessions.is_empty() => {
            println!(
                "No sessions saved in {}",
                color::muted(&store.sessions_dir().display().to_string())
            );
            info!(event = "cli.list_completed", count = 0);
            Ok(())
        }
        Ok(sessions) => {
            println!("{}", color::bold("Saved sessions:"));
            table::print_sessions_table(&sessions);
            info!(event = "cli.list_completed", count = sessions.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ Failed to list sessions: {}", e)));
            error!(event = "cli.list_failed", error = %e);
            log_error(&e);
            Err(e.into())
        }
    }
}
