use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::errors::log_error;

use super::helpers::{load_config_with_warning, session_name, session_store};
use crate::{color, table};

pub(crate) fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    let json_output = matches.get_flag("json");
    info!(event = "cli.show_started", session = %name, json_output = json_output);

    let config = load_config_with_warning();
    match session_store(&config).load(&name) {
        Ok(session) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                println!("Session {}:", color::accent(&session.session_name));
                if let Some(created) = session.session_create_time {
                    println!(
                        "   Created: {}",
                        created
                            .with_timezone(&chrono::Local)
                            .format("%Y-%m-%d %H:%M:%S")
                    );
                }
                if session.is_empty() {
                    println!("No windows recorded.");
                } else {
                    table::print_records_table(&session.window_records);
                }
            }
            info!(
                event = "cli.show_completed",
                session = %name,
                windows = session.window_records.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ {}", e)));
            error!(event = "cli.show_failed", session = %name, error = %e);
            log_error(&e);
            Err(e.into())
        }
    }
}
