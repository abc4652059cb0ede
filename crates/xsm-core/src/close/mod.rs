//! Gracefully close the currently open application windows.

use std::time::Duration;

use tracing::{info, warn};

use crate::errors::XsmError;
use crate::filters::FilterPipeline;
use crate::process::ProcessTable;
use crate::sessions::WindowRecord;
use crate::snapshot::{SnapshotError, capture_filtered};
use crate::window::{WindowId, WindowManager};

/// Pause between two processes so their shutdown dialogs do not pile up.
pub const DEFAULT_CLOSE_PAUSE: Duration = Duration::from_millis(250);

#[derive(Debug, thiserror::Error)]
pub enum CloseError {
    #[error("Failed to collect windows to close: {source}")]
    CaptureFailed {
        #[from]
        source: SnapshotError,
    },
}

impl XsmError for CloseError {
    fn error_code(&self) -> &'static str {
        match self {
            CloseError::CaptureFailed { .. } => "CLOSE_CAPTURE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            CloseError::CaptureFailed { source } => source.is_user_error(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CloseReport {
    pub processes: usize,
    pub closed: Vec<WindowId>,
    pub failures: Vec<(WindowId, String)>,
}

impl CloseReport {
    /// True when there was nothing to close.
    pub fn is_empty(&self) -> bool {
        self.processes == 0
    }
}

/// Group records by owning process, keeping first-seen process order and
/// putting each process's windows in descending handle order.
fn group_by_process(records: Vec<WindowRecord>) -> Vec<(u32, Vec<WindowId>)> {
    let mut groups: Vec<(u32, Vec<WindowId>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(pid, _)| *pid == record.process_id) {
            Some((_, ids)) => ids.push(record.window_id),
            None => groups.push((record.process_id, vec![record.window_id])),
        }
    }
    for (_, ids) in &mut groups {
        ids.sort_unstable_by(|a, b| b.cmp(a));
    }
    groups
}

/// Ask every selected window to close, one process at a time.
///
/// Individual failures are logged and reported; they never stop the batch.
pub fn close_windows(
    windows: &dyn WindowManager,
    processes: &dyn ProcessTable,
    filters: &FilterPipeline,
    pause: Duration,
) -> Result<CloseReport, CloseError> {
    let snapshot = capture_filtered(windows, processes, false, filters)?;
    let groups = group_by_process(snapshot.window_records);

    let mut report = CloseReport {
        processes: groups.len(),
        ..Default::default()
    };
    if groups.is_empty() {
        info!(event = "core.close.nothing_to_close");
        return Ok(report);
    }

    info!(event = "core.close.started", processes = groups.len());
    for (index, (pid, ids)) in groups.into_iter().enumerate() {
        if index > 0 {
            std::thread::sleep(pause);
        }
        for window_id in ids {
            match windows.close_gracefully(window_id) {
                Ok(()) => {
                    info!(event = "core.close.window_closed", pid = pid, window_id = %window_id);
                    report.closed.push(window_id);
                }
                Err(e) => {
                    warn!(
                        event = "core.close.window_close_failed",
                        pid = pid,
                        window_id = %window_id,
                        error = %e
                    );
                    report.failures.push((window_id, e.to_string()));
                }
            }
        }
    }

    info!(
        event = "core.close.completed",
        closed = report.closed.len(),
        failed = report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ExcludeApps;
    use crate::testing::{FakeProcessTable, FakeWindowManager, record, window};

    fn setup() -> (FakeWindowManager, FakeProcessTable) {
        let windows = FakeWindowManager::with_windows(vec![
            window(0x20, Some(0), "Term 1", 200),
            window(0x10, Some(0), "Inbox", 100),
            window(0x22, Some(1), "Term 3", 200),
            window(0x21, Some(1), "Term 2", 200),
            window(0x30, None, "Desktop", 300),
        ]);
        let processes = FakeProcessTable::default();
        processes.add_process(100, "thunderbird", &["thunderbird"]);
        processes.add_process(200, "gnome-terminal-", &["gnome-terminal"]);
        (windows, processes)
    }

    #[test]
    fn group_by_process_orders_handles_descending() {
        let groups = group_by_process(vec![
            record(2, 0x5, "a", 0, &["x"]),
            record(1, 0x1, "b", 0, &["y"]),
            record(2, 0x9, "c", 0, &["x"]),
        ]);
        assert_eq!(
            groups,
            vec![
                (2, vec![WindowId::new(0x9), WindowId::new(0x5)]),
                (1, vec![WindowId::new(0x1)]),
            ]
        );
    }

    #[test]
    fn closes_every_window_process_by_process() {
        let (windows, processes) = setup();
        let report =
            close_windows(&windows, &processes, &FilterPipeline::new(), Duration::ZERO).unwrap();

        assert_eq!(report.processes, 2);
        assert_eq!(
            windows.closes(),
            vec![
                WindowId::new(0x22),
                WindowId::new(0x21),
                WindowId::new(0x20),
                WindowId::new(0x10),
            ]
        );
        assert!(report.failures.is_empty());
    }

    #[test]
    fn filters_limit_what_is_closed() {
        let (windows, processes) = setup();
        let filters = FilterPipeline::new().with(ExcludeApps::from_names(["gnome-terminal"]));
        let report = close_windows(&windows, &processes, &filters, Duration::ZERO).unwrap();

        assert_eq!(report.closed, vec![WindowId::new(0x10)]);
    }

    #[test]
    fn nothing_to_close_is_empty_report() {
        let windows = FakeWindowManager::default();
        let processes = FakeProcessTable::default();
        let report =
            close_windows(&windows, &processes, &FilterPipeline::new(), Duration::ZERO).unwrap();
        assert!(report.is_empty());
        assert!(windows.closes().is_empty());
    }

    #[test]
    fn listing_failure_is_an_error() {
        let (windows, processes) = setup();
        windows.set_fail_listing(true);
        let result = close_windows(&windows, &processes, &FilterPipeline::new(), Duration::ZERO);
        assert!(matches!(result, Err(CloseError::CaptureFailed { .. })));
    }
}
