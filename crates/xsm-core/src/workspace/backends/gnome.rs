//! GNOME (mutter) workspace backend using `gsettings`.

use std::process::Command;

use tracing::{debug, info};

use crate::workspace::errors::WorkspaceError;
use crate::workspace::traits::WorkspaceControl;

const GSETTINGS: &str = "gsettings";
const MUTTER_SCHEMA: &str = "org.gnome.mutter";
const DYNAMIC_WORKSPACES_KEY: &str = "dynamic-workspaces";
const WM_PREFERENCES_SCHEMA: &str = "org.gnome.desktop.wm.preferences";
const NUM_WORKSPACES_KEY: &str = "num-workspaces";

/// Workspace control for GNOME Shell sessions.
pub struct GnomeWorkspaces;

impl GnomeWorkspaces {
    fn gsettings(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new(GSETTINGS)
            .args(args)
            .output()
            .map_err(|e| format!("{} exec failed: {}", GSETTINGS, e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!(
                "{} exit {}: {}",
                GSETTINGS,
                output.status,
                stderr.trim()
            ))
        }
    }

    fn set(&self, schema: &str, key: &str, value: &str) -> Result<(), WorkspaceError> {
        self.gsettings(&["set", schema, key, value])
            .map(|_| ())
            .map_err(|message| WorkspaceError::UpdateFailed { message })?;
        info!(
            event = "core.workspace.setting_changed",
            schema = schema,
            key = key,
            value = value
        );
        Ok(())
    }
}

/// Whether `XDG_CURRENT_DESKTOP` names GNOME (it may be a `:`-separated list).
fn is_gnome_desktop(xdg_current_desktop: &str) -> bool {
    xdg_current_desktop
        .split(':')
        .any(|name| name.eq_ignore_ascii_case("gnome"))
}

/// Parse `gsettings get` output for a boolean key.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl WorkspaceControl for GnomeWorkspaces {
    fn is_managed(&self) -> bool {
        let desktop = std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default();
        let managed = is_gnome_desktop(&desktop) && which::which(GSETTINGS).is_ok();
        debug!(
            event = "core.workspace.detection_completed",
            desktop = %desktop,
            managed = managed
        );
        managed
    }

    fn workspace_count(&self) -> Result<u32, WorkspaceError> {
        // `wmctrl -d` prints one line per existing desktop, which also covers
        // the dynamic case where num-workspaces is not authoritative
        let output = Command::new("wmctrl")
            .arg("-d")
            .output()
            .map_err(|e| WorkspaceError::QueryFailed {
                message: format!("wmctrl exec failed: {}", e),
            })?;
        if !output.status.success() {
            return Err(WorkspaceError::QueryFailed {
                message: format!("wmctrl exit {}", output.status),
            });
        }

        let count = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count();
        u32::try_from(count).map_err(|e| WorkspaceError::QueryFailed {
            message: e.to_string(),
        })
    }

    fn dynamic_workspaces(&self) -> Result<bool, WorkspaceError> {
        let raw = self
            .gsettings(&["get", MUTTER_SCHEMA, DYNAMIC_WORKSPACES_KEY])
            .map_err(|message| WorkspaceError::QueryFailed { message })?;
        parse_bool(&raw).ok_or_else(|| WorkspaceError::QueryFailed {
            message: format!("unexpected {} value '{}'", DYNAMIC_WORKSPACES_KEY, raw),
        })
    }

    fn set_workspace_count(&self, count: u32) -> Result<(), WorkspaceError> {
        self.set(WM_PREFERENCES_SCHEMA, NUM_WORKSPACES_KEY, &count.to_string())
    }

    fn enable_dynamic_workspaces(&self) -> Result<(), WorkspaceError> {
        self.set(MUTTER_SCHEMA, DYNAMIC_WORKSPACES_KEY, "true")
    }

    fn disable_dynamic_workspaces(&self) -> Result<(), WorkspaceError> {
        self.set(MUTTER_SCHEMA, DYNAMIC_WORKSPACES_KEY, "false")
    }
}
