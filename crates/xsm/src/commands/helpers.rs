use std::sync::Arc;

use clap::ArgMatches;
use tracing::warn;

use xsm_core::config::{XsmConfig, base_dir, load_config};
use xsm_core::filters::{ExcludeApps, FilterPipeline, IncludeApps};
use xsm_core::sessions::SessionStore;
use xsm_core::window::{WindowError, WindowManager, WmctrlBackend};

use crate::color;

/// Load config, falling back to defaults with a warning when it is broken.
pub(crate) fn load_config_with_warning() -> XsmConfig {
    match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                color::warning(&format!("Warning: ignoring config file: {}", e))
            );
            warn!(event = "cli.config_load_failed", error = %e);
            XsmConfig::default()
        }
    }
}

pub(crate) fn session_store(config: &XsmConfig) -> SessionStore {
    config.session_store(&base_dir())
}

pub(crate) fn session_name(matches: &ArgMatches) -> Result<String, Box<dyn std::error::Error>> {
    matches
        .get_one::<String>("name")
        .cloned()
        .ok_or_else(|| "Session name is required".into())
}

fn app_names(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Exclude filter (configured names plus `--exclude`) followed by the
/// `--include` filter. Either slot stays empty when it has no names.
pub(crate) fn filter_pipeline(matches: &ArgMatches, config: &XsmConfig) -> FilterPipeline {
    let mut excluded = config.filters.exclude.clone();
    excluded.extend(app_names(matches, "exclude"));

    FilterPipeline::new()
        .with(ExcludeApps::from_names(excluded))
        .with(IncludeApps::from_names(app_names(matches, "include")))
}

/// The `wmctrl` backend, if the tool is installed.
pub(crate) fn window_manager() -> Result<Arc<dyn WindowManager>, WindowError> {
    let backend = WmctrlBackend;
    if !backend.is_available() {
        return Err(WindowError::ToolNotFound {
            tool: "wmctrl".to_string(),
        });
    }
    Ok(Arc::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_cli;

    fn close_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["xsm", "close"];
        argv.extend_from_slice(args);
        build_cli()
            .try_get_matches_from(argv)
            .unwrap()
            .subcommand_matches("close")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_no_names_means_no_active_filters() {
        let matches = close_matches(&[]);
        let pipeline = filter_pipeline(&matches, &XsmConfig::default());
        assert_eq!(pipeline.active_len(), 0);
    }

    #[test]
    fn test_configured_excludes_are_merged() {
        let matches = close_matches(&["--include", "firefox"]);
        let mut config = XsmConfig::default();
        config.filters.exclude = vec!["gnome-shell".to_string()];

        let pipeline = filter_pipeline(&matches, &config);
        assert_eq!(pipeline.active_len(), 2);
    }

    #[test]
    fn test_app_names_collects_repeated_flags() {
        let matches = close_matches(&["-x", "slack", "--exclude", "zoom"]);
        assert_eq!(app_names(&matches, "exclude"), vec!["slack", "zoom"]);
        assert!(app_names(&matches, "include").is_empty());
    }
}
