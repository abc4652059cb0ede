use clap::ArgMatches;
use tracing::{error, info};

mod close;
mod helpers;
mod list;
mod move_windows;
mod restore;
mod save;
mod show;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        event = "cli.app_started",
        version = env!("CARGO_PKG_VERSION")
    );

    match matches.subcommand() {
        Some(("save", sub_matches)) => save::handle_save_command(sub_matches),
        Some(("restore", sub_matches)) => restore::handle_restore_command(sub_matches),
        Some(("move", sub_matches)) => move_windows::handle_move_command(sub_matches),
        Some(("close", sub_matches)) => close::handle_close_command(sub_matches),
        Some(("list", _)) => list::handle_list_command(),
        Some(("show", sub_matches)) => show::handle_show_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
