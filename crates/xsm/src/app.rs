use clap::{Arg, ArgAction, Command};

pub const DEFAULT_SESSION_NAME: &str = "xsession-default";

fn session_name_arg() -> Arg {
    Arg::new("name")
        .help("Session name")
        .index(1)
        .default_value(DEFAULT_SESSION_NAME)
}

fn exclude_arg() -> Arg {
    Arg::new("exclude")
        .long("exclude")
        .short('x')
        .value_name("APP")
        .help("Leave out windows of this application (repeatable)")
        .action(ArgAction::Append)
}

fn include_arg() -> Arg {
    Arg::new("include")
        .long("include")
        .short('i')
        .value_name("APP")
        .help("Only handle windows of this application (repeatable)")
        .action(ArgAction::Append)
}

pub fn build_cli() -> Command {
    Command::new("xsm")
        .about("Save and restore sessions of X11 desktops")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("save")
                .about("Save the windows currently open as a session")
                .arg(session_name_arg())
                .arg(exclude_arg())
                .arg(include_arg()),
        )
        .subcommand(
            Command::new("restore")
                .about("Relaunch a saved session and move windows to their desktops")
                .arg(session_name_arg())
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .value_name("SECS")
                        .help("Seconds to wait between two launches")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(exclude_arg())
                .arg(include_arg()),
        )
        .subcommand(
            Command::new("move")
                .about("Move windows of running applications to their saved desktops")
                .arg(session_name_arg())
                .arg(exclude_arg())
                .arg(include_arg()),
        )
        .subcommand(
            Command::new("close")
                .about("Gracefully close the windows currently open")
                .arg(exclude_arg())
                .arg(include_arg()),
        )
        .subcommand(Command::new("list").about("List saved sessions"))
        .subcommand(
            Command::new("show")
                .about("Show the windows recorded in a session")
                .arg(
                    Arg::new("name")
                        .help("Session name")
                        .index(1)
                        .required(true),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the session file as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(matches: &clap::ArgMatches, id: &str) -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|v| v.cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_cli_build() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_save_defaults_session_name() {
        let matches = build_cli().try_get_matches_from(vec!["xsm", "save"]).unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "save");
        assert_eq!(
            sub.get_one::<String>("name").map(String::as_str),
            Some(DEFAULT_SESSION_NAME)
        );
    }

    #[test]
    fn test_restore_with_interval_and_filters() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "xsm",
                "restore",
                "work",
                "--interval",
                "0.5",
                "--exclude",
                "slack",
                "-x",
                "zoom",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("restore").unwrap();
        assert_eq!(sub.get_one::<String>("name").unwrap(), "work");
        assert_eq!(sub.get_one::<f64>("interval"), Some(&0.5));
        assert_eq!(values(sub, "exclude"), vec!["slack", "zoom"]);
        assert!(values(sub, "include").is_empty());
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        let result =
            build_cli().try_get_matches_from(vec!["xsm", "restore", "--interval", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build_cli()
            .try_get_matches_from(vec!["xsm", "list", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_show_requires_name() {
        assert!(build_cli().try_get_matches_from(vec!["xsm", "show"]).is_err());

        let matches = build_cli()
            .try_get_matches_from(vec!["xsm", "show", "work", "--json"])
            .unwrap();
        let sub = matches.subcommand_matches("show").unwrap();
        assert!(sub.get_flag("json"));
    }

    #[test]
    fn test_close_takes_no_session_name() {
        assert!(
            build_cli()
                .try_get_matches_from(vec!["xsm", "close", "work"])
                .is_err()
        );
    }
}
