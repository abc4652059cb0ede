use std::time::Duration;

use crate::sessions::WindowRecord;
use crate::window::WindowId;

/// Timings and pool size of a restore run.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreSettings {
    /// Pause after each successful launch
    pub launch_interval: Duration,
    /// Total move attempts per launched record, including the first
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    /// Pause after each move command
    pub move_pause: Duration,
    pub workers: usize,
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self {
            launch_interval: Duration::from_secs(2),
            retry_attempts: 6,
            retry_delay: Duration::from_secs(1),
            move_pause: Duration::from_millis(250),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// A record bound to the pid its relaunch produced.
///
/// `pid` is `None` when moving windows of already-running processes; the
/// owner is then found by command line.
#[derive(Debug, Clone)]
pub struct MoveTask {
    pub record: WindowRecord,
    pub pid: Option<u32>,
}

impl MoveTask {
    pub fn new(record: WindowRecord, pid: Option<u32>) -> Self {
        Self { record, pid }
    }

    pub fn target_desktop(&self) -> u32 {
        self.record.desktop_number
    }
}

/// How one record's move ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Move commands were issued for these windows
    Moved { windows: Vec<WindowId> },
    /// A matching window already sits on the target desktop
    AlreadyPlaced,
    /// Every window needing a move was already moved earlier in this run
    AlreadyMoved,
    /// Nothing matched and retrying was not requested
    NothingToMove,
    /// The window never appeared within the retry budget
    Exhausted { attempts: u32 },
    /// A non-retryable error ended the move
    Failed { message: String },
}

impl MoveOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(
            self,
            MoveOutcome::Moved { .. } | MoveOutcome::AlreadyPlaced | MoveOutcome::AlreadyMoved
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoveOutcome::Moved { .. } => "moved",
            MoveOutcome::AlreadyPlaced => "already placed",
            MoveOutcome::AlreadyMoved => "already moved",
            MoveOutcome::NothingToMove => "not found",
            MoveOutcome::Exhausted { .. } => "gave up",
            MoveOutcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoveReport {
    pub record: WindowRecord,
    pub pid: Option<u32>,
    pub outcome: MoveOutcome,
}

#[derive(Debug, Clone)]
pub struct LaunchFailure {
    pub record: WindowRecord,
    pub error: String,
}

/// What a restore or move run did, record by record.
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    pub session_name: String,
    /// Records left after de-duplication and filtering
    pub considered: usize,
    /// Records skipped because they carry no command line
    pub unrestorable: Vec<WindowRecord>,
    pub launch_failures: Vec<LaunchFailure>,
    pub moves: Vec<MoveReport>,
    /// Set when the workspace count could not be raised
    pub workspace_error: Option<String>,
}

impl RestoreReport {
    pub fn new(session_name: impl Into<String>, considered: usize) -> Self {
        Self {
            session_name: session_name.into(),
            considered,
            ..Default::default()
        }
    }

    /// Number of processes started.
    pub fn launched(&self) -> usize {
        self.moves.iter().filter(|m| m.pid.is_some()).count()
    }

    pub fn placed(&self) -> usize {
        self.moves.iter().filter(|m| m.outcome.is_placed()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.launch_failures.is_empty() && self.moves.iter().all(|m| m.outcome.is_placed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    #[test]
    fn test_default_settings() {
        let settings = RestoreSettings::default();
        assert_eq!(settings.launch_interval, Duration::from_secs(2));
        assert_eq!(settings.retry_attempts, 6);
        assert_eq!(settings.retry_delay, Duration::from_secs(1));
        assert_eq!(settings.move_pause, Duration::from_millis(250));
        assert!(settings.workers >= 1);
    }

    #[test]
    fn test_report_counts() {
        let mut report = RestoreReport::new("work", 3);
        report.moves.push(MoveReport {
            record: record(1, 0x1, "a", 0, &["a"]),
            pid: Some(1000),
            outcome: MoveOutcome::AlreadyPlaced,
        });
        report.moves.push(MoveReport {
            record: record(2, 0x2, "b", 1, &["b"]),
            pid: Some(1001),
            outcome: MoveOutcome::Exhausted { attempts: 6 },
        });

        assert_eq!(report.launched(), 2);
        assert_eq!(report.placed(), 1);
        assert!(!report.is_complete());
    }
}
