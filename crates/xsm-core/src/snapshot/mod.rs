//! Capture the currently open windows as a [`SessionConfig`].

use tracing::{debug, info, warn};

use crate::errors::XsmError;
use crate::filters::FilterPipeline;
use crate::process::{ProcessError, ProcessTable};
use crate::sessions::{SessionConfig, WindowRecord, dedup_by_process};
use crate::window::{RunningWindow, WindowError, WindowManager};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to capture session: {source}")]
    WindowListFailed {
        #[from]
        source: WindowError,
    },
}

impl XsmError for SnapshotError {
    fn error_code(&self) -> &'static str {
        match self {
            SnapshotError::WindowListFailed { .. } => "SNAPSHOT_WINDOW_LIST_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            SnapshotError::WindowListFailed { source } => source.is_user_error(),
        }
    }
}

/// Read the window list and enrich every window with its process metadata.
///
/// A process that exits between enumeration and lookup degrades its record
/// (empty name and command line) instead of failing the capture. Sticky
/// windows are not placed on any desktop and are left out.
///
/// With `remove_duplicates_by_pid` only the first window of every process is
/// kept, which is all closing needs; saving keeps every window.
pub fn capture(
    windows: &dyn WindowManager,
    processes: &dyn ProcessTable,
    remove_duplicates_by_pid: bool,
) -> Result<SessionConfig, SnapshotError> {
    info!(
        event = "core.snapshot.capture_started",
        backend = windows.name(),
        remove_duplicates_by_pid = remove_duplicates_by_pid
    );

    let running = windows.list_windows()?;
    let total = running.len();

    let (placed, sticky): (Vec<RunningWindow>, Vec<RunningWindow>) =
        running.into_iter().partition(|w| w.desktop.is_some());

    for pid in sticky_only_pids(&placed, &sticky) {
        let app = processes.lookup(pid).map(|info| info.name).unwrap_or_default();
        warn!(
            event = "core.snapshot.sticky_app_not_saved",
            pid = pid,
            app = %app,
            "Application only has windows on all desktops and will not be restored"
        );
    }
    for window in &sticky {
        debug!(
            event = "core.snapshot.sticky_window_skipped",
            window_id = %window.window_id,
            title = %window.title
        );
    }

    let mut records: Vec<WindowRecord> = placed
        .into_iter()
        .filter_map(|window| {
            let desktop_number = window.desktop?;
            Some(WindowRecord {
                application_name: String::new(),
                command_line: Vec::new(),
                desktop_number,
                process_create_time: None,
                process_id: window.process_id,
                window_id: window.window_id,
                window_id_int: Some(window.window_id.as_u64()),
                window_title: window.title,
            })
        })
        .collect();

    if remove_duplicates_by_pid {
        records = dedup_by_process(records);
    }

    for record in &mut records {
        match processes.lookup(record.process_id) {
            Ok(info) => {
                record.application_name = info.name;
                record.command_line = info.command_line;
                record.process_create_time = info.create_time;
            }
            Err(ProcessError::NoSuchProcess { pid }) => {
                warn!(
                    event = "core.snapshot.process_vanished",
                    pid = pid,
                    window_id = %record.window_id,
                    title = %record.window_title
                );
            }
            Err(e) => {
                warn!(
                    event = "core.snapshot.process_lookup_failed",
                    pid = record.process_id,
                    error = %e
                );
            }
        }
    }

    info!(
        event = "core.snapshot.capture_completed",
        windows = total,
        records = records.len()
    );
    Ok(SessionConfig::new(String::new(), records))
}

/// Processes whose every window is sticky, in first-seen order. These drop
/// out of a capture entirely.
fn sticky_only_pids(placed: &[RunningWindow], sticky: &[RunningWindow]) -> Vec<u32> {
    let mut pids: Vec<u32> = Vec::new();
    for window in sticky {
        let has_placed = placed.iter().any(|w| w.process_id == window.process_id);
        if !has_placed && !pids.contains(&window.process_id) {
            pids.push(window.process_id);
        }
    }
    pids
}

/// [`capture`] followed by the filter pipeline.
pub fn capture_filtered(
    windows: &dyn WindowManager,
    processes: &dyn ProcessTable,
    remove_duplicates_by_pid: bool,
    filters: &FilterPipeline,
) -> Result<SessionConfig, SnapshotError> {
    let mut config = capture(windows, processes, remove_duplicates_by_pid)?;
    config.window_records = filters.apply(config.window_records);
    Ok(config)
}
