use std::sync::Arc;
use std::thread::JoinHandle;

use futures::future::join_all;
use tracing::{error, info, warn};

use super::errors::RestoreError;
use super::moved::MovedWindows;
use super::mover::{MoveContext, attempt_move, move_with_retry};
use super::pool::WorkerPool;
use super::types::{LaunchFailure, MoveOutcome, MoveReport, MoveTask, RestoreReport, RestoreSettings};
use crate::filters::{FilterPipeline, SessionFilter, SortByDesktop};
use crate::process::ProcessTable;
use crate::sessions::{SessionConfig, WindowRecord, dedup_by_process};
use crate::window::WindowManager;
use crate::workspace::{CapacityGuard, WorkspaceControl, ensure_capacity};

/// Relaunches the applications of a saved session and moves their windows
/// back onto their recorded desktops.
pub struct RestoreReconciler {
    windows: Arc<dyn WindowManager>,
    processes: Arc<dyn ProcessTable>,
    workspaces: Arc<dyn WorkspaceControl>,
    filters: FilterPipeline,
    settings: RestoreSettings,
}

impl RestoreReconciler {
    pub fn new(
        windows: Arc<dyn WindowManager>,
        processes: Arc<dyn ProcessTable>,
        workspaces: Arc<dyn WorkspaceControl>,
    ) -> Self {
        Self {
            windows,
            processes,
            workspaces,
            filters: FilterPipeline::new(),
            settings: RestoreSettings::default(),
        }
    }

    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_settings(mut self, settings: RestoreSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &RestoreSettings {
        &self.settings
    }

    /// Restore `session` and wait for every move task to settle.
    ///
    /// Only one launch per recorded process happens. Launch and move failures
    /// are logged and reported per record; the run itself fails only when the
    /// worker pool cannot be started.
    pub fn restore(&self, session: &SessionConfig) -> Result<RestoreReport, RestoreError> {
        info!(
            event = "core.restore.started",
            session = %session.session_name,
            records = session.window_records.len()
        );

        let records = self
            .filters
            .apply(dedup_by_process(session.window_records.clone()));
        let mut report = RestoreReport::new(session.session_name.clone(), records.len());
        if records.is_empty() {
            info!(
                event = "core.restore.nothing_to_restore",
                session = %session.session_name
            );
            return Ok(report);
        }

        let _capacity = self.reserve_workspaces(&records, &mut report);
        let pool = WorkerPool::new(self.settings.workers)?;
        let ctx = self.move_context();

        let mut tasks = Vec::new();
        for record in records {
            if !record.is_restorable() {
                warn!(
                    event = "core.restore.record_unrestorable",
                    title = %record.window_title,
                    pid = record.process_id
                );
                report.unrestorable.push(record);
                continue;
            }

            let pid = match self.processes.launch(&record.command_line) {
                Ok(pid) => pid,
                Err(e) => {
                    warn!(
                        event = "core.restore.launch_failed",
                        app = %record.application_name,
                        error = %e
                    );
                    report.launch_failures.push(LaunchFailure {
                        record,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            info!(
                event = "core.restore.launched",
                app = %record.application_name,
                pid = pid,
                desktop = record.desktop_number
            );
            let task = MoveTask::new(record, Some(pid));
            let fallback = task.clone();
            tasks.push((fallback, pool.spawn(move_with_retry(Arc::clone(&ctx), task))));

            std::thread::sleep(self.settings.launch_interval);
        }

        let (fallbacks, handles): (Vec<MoveTask>, Vec<_>) = tasks.into_iter().unzip();
        let results = pool.block_on(join_all(handles));
        for (task, result) in fallbacks.into_iter().zip(results) {
            let move_report = result.unwrap_or_else(|e| {
                error!(
                    event = "core.restore.move_task_panicked",
                    title = %task.record.window_title,
                    error = %e
                );
                MoveReport {
                    record: task.record,
                    pid: task.pid,
                    outcome: MoveOutcome::Failed {
                        message: e.to_string(),
                    },
                }
            });
            report.moves.push(move_report);
        }
        drop(pool);

        info!(
            event = "core.restore.completed",
            session = %report.session_name,
            launched = report.launched(),
            placed = report.placed(),
            unrestorable = report.unrestorable.len(),
            launch_failures = report.launch_failures.len()
        );
        Ok(report)
    }

    /// Move windows of already-running applications onto their recorded
    /// desktops without launching anything.
    ///
    /// Records are handled one by one in desktop order with a single attempt
    /// each. Owners are found by command line.
    pub fn move_windows(&self, session: &SessionConfig) -> Result<RestoreReport, RestoreError> {
        info!(
            event = "core.restore.move_started",
            session = %session.session_name,
            records = session.window_records.len()
        );

        let records = self
            .filters
            .apply(SortByDesktop.apply(session.window_records.clone()));
        let mut report = RestoreReport::new(session.session_name.clone(), records.len());
        if records.is_empty() {
            return Ok(report);
        }

        let _capacity = self.reserve_workspaces(&records, &mut report);
        let pool = WorkerPool::new(1)?;
        let ctx = self.move_context();

        report.moves = pool.block_on(async {
            let mut moves = Vec::with_capacity(records.len());
            for record in records {
                let task = MoveTask::new(record, None);
                let outcome = match attempt_move(&ctx, &task, false).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(
                            event = "core.restore.move_failed",
                            title = %task.record.window_title,
                            error = %e
                        );
                        MoveOutcome::Failed {
                            message: e.to_string(),
                        }
                    }
                };
                moves.push(MoveReport {
                    record: task.record,
                    pid: None,
                    outcome,
                });
            }
            moves
        });
        drop(pool);

        info!(
            event = "core.restore.move_completed",
            session = %report.session_name,
            placed = report.placed(),
            considered = report.considered
        );
        Ok(report)
    }

    /// Run [`restore`](Self::restore) on its own thread.
    ///
    /// The reconciler moves into the thread with all its collaborators, so
    /// the caller may keep working (or exit its own loops) while windows are
    /// being placed.
    pub fn spawn_detached(self, session: SessionConfig) -> Result<DetachedRestore, RestoreError> {
        let handle = std::thread::Builder::new()
            .name("xsm-restore".to_string())
            .spawn(move || self.restore(&session))
            .map_err(|e| RestoreError::SpawnFailed {
                message: e.to_string(),
            })?;
        Ok(DetachedRestore { handle })
    }

    fn move_context(&self) -> Arc<MoveContext> {
        Arc::new(MoveContext {
            windows: Arc::clone(&self.windows),
            processes: Arc::clone(&self.processes),
            moved: MovedWindows::new(),
            settings: self.settings.clone(),
        })
    }

    /// Raise the workspace count to cover every record. Failure is logged
    /// and the run continues without the guarantee.
    fn reserve_workspaces(
        &self,
        records: &[WindowRecord],
        report: &mut RestoreReport,
    ) -> Option<CapacityGuard> {
        let required = records
            .iter()
            .map(|r| r.desktop_number.saturating_add(1))
            .max()
            .unwrap_or(1);

        match ensure_capacity(&self.workspaces, required) {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(
                    event = "core.restore.workspace_capacity_failed",
                    required = required,
                    error = %e
                );
                report.workspace_error = Some(e.to_string());
                None
            }
        }
    }
}

/// Handle to a restore running on its own thread.
pub struct DetachedRestore {
    handle: JoinHandle<Result<RestoreReport, RestoreError>>,
}

impl DetachedRestore {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the whole batch to finish.
    pub fn join(self) -> Result<RestoreReport, RestoreError> {
        self.handle.join().map_err(|_| RestoreError::TaskPanicked)?
    }
}
