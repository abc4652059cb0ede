use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::errors::SessionError;
use super::types::{SessionConfig, SessionListing, SessionSummary};
use super::validation::validate_session_name;

/// Outcome of [`SessionStore::save`].
#[derive(Debug, Clone)]
pub struct SavedSession {
    pub path: PathBuf,
    /// Where the previous file with the same name was moved, if there was one
    pub backup_path: Option<PathBuf>,
    pub config: SessionConfig,
}

/// Session files on disk: one JSON document per session name, plus a
/// separate directory of timestamped backups.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions_dir: PathBuf,
    backups_dir: PathBuf,
}

impl SessionStore {
    pub fn new(sessions_dir: impl Into<PathBuf>, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions_dir: sessions_dir.into(),
            backups_dir: backups_dir.into(),
        }
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Canonical path of the session called `name`.
    pub fn session_path(&self, name: &str) -> Result<PathBuf, SessionError> {
        validate_session_name(name)?;
        Ok(self.sessions_dir.join(name))
    }

    /// Persist `config` as session `name`.
    ///
    /// The config is stamped with the name and a fresh creation time. An
    /// existing file with the same name is copied to the backup directory
    /// before it is replaced.
    pub fn save(&self, name: &str, mut config: SessionConfig) -> Result<SavedSession, SessionError> {
        let path = self.session_path(name)?;
        info!(
            event = "core.session.save_started",
            session = name,
            path = %path.display(),
            windows = config.window_records.len()
        );

        let backup_path = if path.exists() {
            Some(self.backup(&path)?)
        } else {
            create_parent_dir(&path)?;
            None
        };

        config.session_name = name.to_string();
        config.session_create_time = Some(Utc::now());
        config.backup_time = None;

        write_session(&path, &config)?;

        info!(
            event = "core.session.save_completed",
            session = name,
            path = %path.display(),
            backup = ?backup_path
        );

        Ok(SavedSession {
            path,
            backup_path,
            config,
        })
    }

    /// Copy the session file at `path` into the backup directory.
    ///
    /// The copy is stamped with `backupTime` and named
    /// `<file name>.backup-<YYYYMMDDHHMMSSffffff>`.
    /// A file that no longer decodes is copied byte for byte so a bad hand
    /// edit never blocks saving and is still recoverable.
    pub fn backup(&self, path: &Path) -> Result<PathBuf, SessionError> {
        let backup_time = Utc::now();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SessionError::InvalidSession {
                path: path.display().to_string(),
                message: "path has no file name".to_string(),
            })?;
        let backup_path = unique_backup_path(&self.backups_dir, &file_name, backup_time);

        create_parent_dir(&backup_path)?;
        match read_session(path) {
            Ok(mut config) => {
                config.backup_time = Some(backup_time);
                write_session(&backup_path, &config)?;
            }
            Err(SessionError::InvalidSession { message, .. }) => {
                warn!(
                    event = "core.session.backup_raw_copy",
                    original = %path.display(),
                    reason = %message
                );
                std::fs::copy(path, &backup_path).map_err(|e| SessionError::IoError {
                    action: "copy",
                    path: path.display().to_string(),
                    source: e,
                })?;
            }
            Err(e) => return Err(e),
        }

        info!(
            event = "core.session.backup_completed",
            original = %path.display(),
            backup = %backup_path.display()
        );
        Ok(backup_path)
    }

    /// Read and validate session `name`.
    pub fn load(&self, name: &str) -> Result<SessionConfig, SessionError> {
        let path = self.session_path(name)?;
        if !path.is_file() {
            return Err(SessionError::NotFound {
                name: name.to_string(),
                path: path.display().to_string(),
            });
        }

        let config = read_session(&path)?;
        debug!(
            event = "core.session.load_completed",
            session = name,
            windows = config.window_records.len()
        );
        Ok(config)
    }

    /// Every file in the sessions directory, sorted by name.
    ///
    /// Unreadable or invalid files are listed with their error instead of
    /// failing the listing.
    pub fn list(&self) -> Result<Vec<SessionListing>, SessionError> {
        let entries = match std::fs::read_dir(&self.sessions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SessionError::IoError {
                    action: "list",
                    path: self.sessions_dir.display().to_string(),
                    source: e,
                });
            }
        };

        let mut listings = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(event = "core.session.list_entry_failed", error = %e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let summary = read_session(&path)
                .map(|config| SessionSummary {
                    name: name.clone(),
                    window_count: config.window_records.len(),
                    session_create_time: config.session_create_time,
                })
                .map_err(|e| e.to_string());
            listings.push(SessionListing { name, summary });
        }

        listings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listings)
    }
}

/// Backup path for `file_name` at `backup_time`, bumped by a microsecond
/// until it does not collide with an existing backup.
fn unique_backup_path(backups_dir: &Path, file_name: &str, backup_time: DateTime<Utc>) -> PathBuf {
    let mut stamp = backup_time;
    loop {
        let id = stamp.with_timezone(&Local).format("%Y%m%d%H%M%S%6f");
        let candidate = backups_dir.join(format!("{}.backup-{}", file_name, id));
        if !candidate.exists() {
            return candidate;
        }
        stamp += TimeDelta::microseconds(1);
    }
}

fn create_parent_dir(path: &Path) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SessionError::IoError {
            action: "create directory",
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

fn read_session(path: &Path) -> Result<SessionConfig, SessionError> {
    let content = std::fs::read(path).map_err(|e| SessionError::IoError {
        action: "read",
        path: path.display().to_string(),
        source: e,
    })?;

    let config: SessionConfig =
        serde_json::from_slice(&content).map_err(|e| SessionError::InvalidSession {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    config
        .validate()
        .map_err(|message| SessionError::InvalidSession {
            path: path.display().to_string(),
            message,
        })?;
    Ok(config)
}

/// Pretty-print with 4-space indentation and sorted keys so session files
/// stay diff-friendly and hand-editable.
fn to_session_json(config: &SessionConfig) -> Result<Vec<u8>, SessionError> {
    let serialize_failed = |e: serde_json::Error| SessionError::SerializeFailed {
        message: e.to_string(),
    };

    // serde_json::Map is a BTreeMap, so going through Value sorts the keys
    let value = serde_json::to_value(config).map_err(serialize_failed)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).map_err(serialize_failed)?;
    buf.push(b'\n');
    Ok(buf)
}

fn write_session(path: &Path, config: &SessionConfig) -> Result<(), SessionError> {
    let json = to_session_json(config)?;
    std::fs::write(path, json).map_err(|e| SessionError::IoError {
        action: "write",
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> SessionStore {
        SessionStore::new(
            temp.path().join("sessions"),
            temp.path().join("session-backups"),
        )
    }

    fn sample_config() -> SessionConfig {
        SessionConfig::new(
            "ignored",
            vec![
                record(100, 0x3a00007, "Inbox - Thunderbird", 0, &["/usr/bin/thunderbird"]),
                record(200, 0x4200003, "~/src - Terminal", 3, &["gnome-terminal", "--tab"]),
                record(200, 0x4200009, "build - Terminal", 1, &["gnome-terminal", "--tab"]),
            ],
        )
    }

    #[test]
    fn test_save_then_load_round_trips_records() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let original = sample_config();

        let saved = store.save("work", original.clone()).unwrap();
        assert!(saved.path.exists());
        assert!(saved.backup_path.is_none());

        let loaded = store.load("work").unwrap();
        assert_eq!(loaded.session_name, "work");
        assert_eq!(loaded.window_records, original.window_records);
        assert!(loaded.session_create_time.is_some());
        assert!(loaded.backup_time.is_none());
        assert_eq!(loaded, saved.config);
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("a/b/c"), temp.path().join("d"));
        store.save("deep", sample_config()).unwrap();
        assert!(temp.path().join("a/b/c/deep").is_file());
    }

    #[test]
    fn test_load_missing_session_is_not_found() {
        let temp = TempDir::new().unwrap();
        let result = store(&temp).load("nope");
        assert!(matches!(result, Err(SessionError::NotFound { name, .. }) if name == "nope"));
    }

    #[test]
    fn test_load_rejects_invalid_name() {
        let temp = TempDir::new().unwrap();
        let result = store(&temp).load("../escape");
        assert!(matches!(result, Err(SessionError::InvalidName { .. })));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        std::fs::create_dir_all(store.sessions_dir()).unwrap();
        std::fs::write(store.sessions_dir().join("broken"), "{ not json").unwrap();

        let result = store.load("broken");
        assert!(matches!(result, Err(SessionError::InvalidSession { .. })));
    }

    #[test]
    fn test_load_rejects_duplicate_window_ids() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        std::fs::create_dir_all(store.sessions_dir()).unwrap();
        let json = r#"{"sessionName":"dup","windowRecords":[
            {"applicationName":"a","commandLine":["a"],"desktopNumber":0,"processId":1,"windowId":"0x10","windowTitle":"a"},
            {"applicationName":"b","commandLine":["b"],"desktopNumber":1,"processId":2,"windowId":"0x10","windowTitle":"b"}
        ]}"#;
        std::fs::write(store.sessions_dir().join("dup"), json).unwrap();

        match store.load("dup") {
            Err(SessionError::InvalidSession { message, .. }) => {
                assert!(message.contains("duplicate windowId"));
            }
            other => panic!("expected InvalidSession, got {:?}", other),
        }
    }

    #[test]
    fn test_saved_file_has_sorted_keys_and_four_space_indent() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let saved = store.save("work", sample_config()).unwrap();
        let content = std::fs::read_to_string(saved.path).unwrap();

        assert!(content.starts_with("{\n    \""));
        let create = content.find("\"sessionCreateTime\"").unwrap();
        let name = content.find("\"sessionName\"").unwrap();
        let records = content.find("\"windowRecords\"").unwrap();
        assert!(create < name && name < records);

        let app = content.find("\"applicationName\"").unwrap();
        let title = content.find("\"windowTitle\"").unwrap();
        assert!(app < title);
        assert!(!content.contains("backupTime"));
    }

    #[test]
    fn test_second_save_backs_up_previous_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let first = store.save("work", sample_config()).unwrap();
        let mut changed = sample_config();
        changed.window_records.truncate(1);
        let second = store.save("work", changed).unwrap();

        let backup_path = second.backup_path.expect("second save should back up");
        assert!(backup_path.starts_with(store.backups_dir()));
        let file_name = backup_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("work.backup-"));
        let id = file_name.trim_start_matches("work.backup-");
        assert_eq!(id.len(), 20, "YYYYMMDDHHMMSS + 6 fractional digits");
        assert!(id.chars().all(|c| c.is_ascii_digit()));

        let backup: SessionConfig =
            serde_json::from_str(&std::fs::read_to_string(&backup_path).unwrap()).unwrap();
        assert!(backup.backup_time.is_some());
        assert_eq!(backup.window_records, first.config.window_records);
        assert_eq!(backup.session_create_time, first.config.session_create_time);

        assert_eq!(store.load("work").unwrap().window_records.len(), 1);
    }

    #[test]
    fn test_rapid_saves_produce_distinct_backups() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        store.save("work", sample_config()).unwrap();
        let mut backups = Vec::new();
        for _ in 0..5 {
            let saved = store.save("work", sample_config()).unwrap();
            backups.push(saved.backup_path.unwrap());
        }

        let mut unique = backups.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), backups.len());
        assert_eq!(std::fs::read_dir(store.backups_dir()).unwrap().count(), 5);
    }

    #[test]
    fn test_invalid_existing_file_is_backed_up_verbatim() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        std::fs::create_dir_all(store.sessions_dir()).unwrap();
        std::fs::write(store.sessions_dir().join("work"), "hand edited {").unwrap();

        let saved = store.save("work", sample_config()).unwrap();
        let backup = saved.backup_path.unwrap();
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "hand edited {");
        assert!(store.load("work").is_ok());
    }

    #[test]
    fn test_non_utf8_existing_file_is_backed_up_verbatim() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        std::fs::create_dir_all(store.sessions_dir()).unwrap();
        let garbage = [0xff, 0xfe, b'{'];
        std::fs::write(store.sessions_dir().join("work"), garbage).unwrap();

        let saved = store.save("work", sample_config()).unwrap();
        let backup = saved.backup_path.unwrap();
        assert_eq!(std::fs::read(backup).unwrap(), garbage);
        assert!(matches!(
            store.load("work"),
            Ok(config) if config.window_records.len() == 3
        ));
    }

    #[test]
    fn test_load_reports_non_utf8_file_as_invalid() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        std::fs::create_dir_all(store.sessions_dir()).unwrap();
        std::fs::write(store.sessions_dir().join("work"), [0xff, 0xfe, b'{']).unwrap();

        assert!(matches!(
            store.load("work"),
            Err(SessionError::InvalidSession { .. })
        ));
    }

    #[test]
    fn test_unique_backup_path_skips_existing_file() {
        let temp = TempDir::new().unwrap();
        let now = Utc::now();
        let first = unique_backup_path(temp.path(), "work", now);
        std::fs::write(&first, "{}").unwrap();

        let second = unique_backup_path(temp.path(), "work", now);
        assert_ne!(first, second);
    }

    #[test]
    fn test_list_reports_valid_and_broken_sessions() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert!(store.list().unwrap().is_empty());

        store.save("b-work", sample_config()).unwrap();
        std::fs::write(store.sessions_dir().join("a-broken"), "[]").unwrap();

        let listings = store.list().unwrap();
        let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a-broken", "b-work"]);
        assert!(listings[0].summary.is_err());
        assert_eq!(listings[1].summary.as_ref().unwrap().window_count, 3);
    }
}
