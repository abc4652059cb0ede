//! `wmctrl` window manager backend (EWMH-compliant X11 window managers).

use std::process::Command;

use tracing::{debug, info, warn};

use crate::window::errors::WindowError;
use crate::window::traits::WindowManager;
use crate::window::types::{RunningWindow, WindowId};

const WMCTRL: &str = "wmctrl";

/// Window manager backend that shells out to `wmctrl`.
pub struct WmctrlBackend;

impl WmctrlBackend {
    fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new(WMCTRL)
            .args(args)
            .output()
            .map_err(|e| format!("{} exec failed: {}", WMCTRL, e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("{} exit {}: {}", WMCTRL, output.status, stderr.trim()))
        }
    }
}

impl WindowManager for WmctrlBackend {
    fn name(&self) -> &'static str {
        "wmctrl"
    }

    fn is_available(&self) -> bool {
        which::which(WMCTRL).is_ok()
    }

    fn list_windows(&self) -> Result<Vec<RunningWindow>, WindowError> {
        if !self.is_available() {
            return Err(WindowError::ToolNotFound {
                tool: WMCTRL.to_string(),
            });
        }

        let stdout = self
            .run(&["-l", "-p"])
            .map_err(|message| WindowError::EnumerationFailed { message })?;

        let windows: Vec<RunningWindow> = stdout
            .lines()
            .filter_map(|line| {
                let parsed = parse_window_line(line);
                if parsed.is_none() && !line.trim().is_empty() {
                    warn!(event = "core.window.line_unparsed", line = line);
                }
                parsed
            })
            .collect();

        debug!(event = "core.window.list_completed", count = windows.len());
        Ok(windows)
    }

    fn move_to_desktop(&self, window_id: WindowId, desktop: u32) -> Result<(), WindowError> {
        let id = window_id.to_string();
        let target = desktop.to_string();

        self.run(&["-i", "-r", &id, "-t", &target])
            .map_err(|message| WindowError::MoveFailed {
                window_id,
                desktop,
                message,
            })?;

        info!(
            event = "core.window.move_requested",
            window_id = %window_id,
            desktop = desktop
        );
        Ok(())
    }

    fn close_gracefully(&self, window_id: WindowId) -> Result<(), WindowError> {
        let id = window_id.to_string();

        self.run(&["-i", "-c", &id])
            .map_err(|message| WindowError::CloseFailed { window_id, message })?;

        info!(event = "core.window.close_requested", window_id = %window_id);
        Ok(())
    }
}

/// Parse one line of `wmctrl -l -p` output.
///
/// Format: `<id> <desktop> <pid> <client machine> <title...>`. The title may
/// contain any whitespace or be missing entirely.
pub(crate) fn parse_window_line(line: &str) -> Option<RunningWindow> {
    let mut rest = line.trim_start();
    let mut fields = [""; 4];
    for field in fields.iter_mut() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        *field = &rest[..end];
        rest = rest[end..].trim_start();
    }

    let window_id: WindowId = fields[0].parse().ok()?;
    let desktop = match fields[1].parse::<i64>().ok()? {
        -1 => None,
        n => Some(u32::try_from(n).ok()?),
    };
    let process_id = fields[2].parse::<u32>().ok()?;

    Some(RunningWindow {
        window_id,
        desktop,
        title: rest.trim_end().to_string(),
        process_id,
    })
}
