use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::errors::ConfigError;
use super::types::XsmConfig;

const APP_DIR: &str = "xsession-manager";
const CONFIG_FILE: &str = "config.toml";

/// Base directory for config, sessions and backups.
///
/// `XSM_HOME` wins when set; otherwise `$XDG_CONFIG_HOME/xsession-manager`.
/// Falls back to `./.xsession-manager` if no config directory can be determined.
pub fn base_dir() -> PathBuf {
    // Allow override via env var for testing and portable setups.
    if let Ok(path_str) = std::env::var("XSM_HOME")
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }

    match dirs::config_dir() {
        Some(config) => config.join(APP_DIR),
        None => {
            tracing::error!(
                event = "core.config.config_dir_not_found",
                fallback = ".",
                "Could not determine config directory - using current directory as fallback"
            );
            PathBuf::from(".").join(format!(".{}", APP_DIR))
        }
    }
}

pub fn config_path() -> PathBuf {
    base_dir().join(CONFIG_FILE)
}

/// Load `config.toml` from the base directory.
pub fn load_config() -> Result<XsmConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load and validate a config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<XsmConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.config.file_missing",
                path = %path.display()
            );
            return Ok(XsmConfig::default());
        }
        Err(e) => return Err(e.into()),
    };

    let config: XsmConfig = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    config.validate()?;

    info!(
        event = "core.config.loaded",
        path = %path.display(),
        excluded_apps = config.filters.exclude.len()
    );
    Ok(config)
}
