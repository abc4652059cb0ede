use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::errors::ConfigError;
use crate::restore::RestoreSettings;
use crate::sessions::SessionStore;

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XsmConfig {
    pub paths: PathsConfig,
    pub restore: RestoreConfig,
    pub filters: FiltersConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub sessions_dir: Option<PathBuf>,
    pub backups_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RestoreConfig {
    pub launch_interval_secs: f64,
    pub retry_attempts: u32,
    pub retry_delay_secs: f64,
    pub move_pause_ms: u64,
    /// 0 means one worker per available CPU
    pub workers: usize,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        let defaults = RestoreSettings::default();
        Self {
            launch_interval_secs: defaults.launch_interval.as_secs_f64(),
            retry_attempts: defaults.retry_attempts,
            retry_delay_secs: defaults.retry_delay.as_secs_f64(),
            move_pause_ms: u64::try_from(defaults.move_pause.as_millis()).unwrap_or(250),
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiltersConfig {
    /// Applications never saved, closed or restored
    pub exclude: Vec<String>,
}

fn seconds(key: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidConfiguration {
        message: format!(
            "restore.{} must be a finite, non-negative number of seconds (got {})",
            key, value
        ),
    })
}

impl XsmConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.restore_settings().map(|_| ())
    }

    /// Timings and pool size for the restore engine.
    pub fn restore_settings(&self) -> Result<RestoreSettings, ConfigError> {
        let restore = &self.restore;
        if restore.retry_attempts == 0 {
            return Err(ConfigError::InvalidConfiguration {
                message: "restore.retry_attempts must be at least 1".to_string(),
            });
        }

        let mut settings = RestoreSettings {
            launch_interval: seconds("launch_interval_secs", restore.launch_interval_secs)?,
            retry_attempts: restore.retry_attempts,
            retry_delay: seconds("retry_delay_secs", restore.retry_delay_secs)?,
            move_pause: Duration::from_millis(restore.move_pause_ms),
            ..RestoreSettings::default()
        };
        if restore.workers > 0 {
            settings.workers = restore.workers;
        }
        Ok(settings)
    }

    /// Session directory, relative paths resolved against `base`.
    pub fn sessions_dir(&self, base: &Path) -> PathBuf {
        match &self.paths.sessions_dir {
            Some(dir) => base.join(dir),
            None => base.join("sessions"),
        }
    }

    pub fn backups_dir(&self, base: &Path) -> PathBuf {
        match &self.paths.backups_dir {
            Some(dir) => base.join(dir),
            None => base.join("session-backups"),
        }
    }

    pub fn session_store(&self, base: &Path) -> SessionStore {
        SessionStore::new(self.sessions_dir(base), self.backups_dir(base))
    }
}
