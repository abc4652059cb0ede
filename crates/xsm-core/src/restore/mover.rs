use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::errors::MoveError;
use super::moved::MovedWindows;
use super::types::{MoveOutcome, MoveReport, MoveTask, RestoreSettings};
use crate::process::ProcessTable;
use crate::sessions::WindowRecord;
use crate::window::{RunningWindow, WindowManager};

/// Collaborators shared by every move task of one run.
pub(crate) struct MoveContext {
    pub(crate) windows: Arc<dyn WindowManager>,
    pub(crate) processes: Arc<dyn ProcessTable>,
    pub(crate) moved: MovedWindows,
    pub(crate) settings: RestoreSettings,
}

/// Which windows of the candidate processes need moving.
#[derive(Debug, Default)]
pub(crate) struct MovePlan {
    pub(crate) to_move: Vec<RunningWindow>,
    /// A title-matching window is already on the target desktop
    pub(crate) placed: bool,
    /// A candidate window exists but its title does not match yet
    pub(crate) unsettled: bool,
}

/// Pids whose windows may belong to `task`.
///
/// A launched process counts together with its direct children, since
/// launchers often hand the window to a child. Without a pid the oldest
/// process running the recorded command line is used.
pub(crate) fn candidate_pids(processes: &dyn ProcessTable, task: &MoveTask) -> Vec<u32> {
    match task.pid {
        Some(pid) => {
            let mut pids = processes.children(pid);
            pids.push(pid);
            pids
        }
        None if task.record.command_line.is_empty() => Vec::new(),
        None => processes
            .find_by_command_line(&task.record.command_line)
            .into_iter()
            .collect(),
    }
}

pub(crate) fn plan_moves(
    record: &WindowRecord,
    candidates: &[u32],
    mut running: Vec<RunningWindow>,
) -> MovePlan {
    running.sort_by_key(|w| w.desktop);

    let target = Some(record.desktop_number);
    let mut plan = MovePlan::default();
    for window in running
        .into_iter()
        .filter(|w| candidates.contains(&w.process_id))
    {
        if window.title != record.window_title {
            plan.unsettled = true;
        } else if window.desktop == target {
            plan.placed = true;
        } else {
            plan.to_move.push(window);
        }
    }
    plan
}

/// One attempt at placing the windows of `task`.
///
/// With `need_retry` a missing or not-yet-titled window is reported as
/// [`MoveError::NeedsRetry`]; otherwise it ends as `NothingToMove`. Process
/// and window manager calls shell out or scan `/proc`, so they run on the
/// blocking pool.
pub(crate) async fn attempt_move(
    ctx: &Arc<MoveContext>,
    task: &MoveTask,
    need_retry: bool,
) -> Result<MoveOutcome, MoveError> {
    let (candidates, running) = {
        let ctx = Arc::clone(ctx);
        let task = task.clone();
        tokio::task::spawn_blocking(move || {
            let candidates = candidate_pids(ctx.processes.as_ref(), &task);
            ctx.windows
                .list_windows()
                .map(|running| (candidates, running))
        })
        .await??
    };
    let plan = plan_moves(&task.record, &candidates, running);

    if plan.to_move.is_empty() {
        if plan.placed {
            return Ok(MoveOutcome::AlreadyPlaced);
        }
        if !need_retry {
            return Ok(MoveOutcome::NothingToMove);
        }
        let reason = if plan.unsettled {
            "window title does not match yet"
        } else {
            "no window for the process yet"
        };
        return Err(MoveError::NeedsRetry {
            title: task.record.window_title.clone(),
            reason,
        });
    }

    let target = task.target_desktop();
    let mut moved = Vec::new();
    for window in plan.to_move {
        let window_id = window.window_id;
        if !ctx.moved.claim(window_id) {
            debug!(
                event = "core.restore.window_already_moved",
                window_id = %window_id
            );
            continue;
        }

        info!(
            event = "core.restore.window_moving",
            window_id = %window_id,
            title = %window.title,
            from = ?window.desktop,
            to = target
        );
        let result = {
            let ctx = Arc::clone(ctx);
            tokio::task::spawn_blocking(move || ctx.windows.move_to_desktop(window_id, target))
                .await
                .map_err(MoveError::from)
                .and_then(|r| r.map_err(MoveError::from))
        };
        if let Err(e) = result {
            ctx.moved.release(window_id);
            return Err(e);
        }
        moved.push(window_id);
        tokio::time::sleep(ctx.settings.move_pause).await;
    }

    if moved.is_empty() {
        Ok(MoveOutcome::AlreadyMoved)
    } else {
        Ok(MoveOutcome::Moved { windows: moved })
    }
}

/// Repeat [`attempt_move`] until it settles or the attempts run out.
///
/// Never fails: every ending is folded into the returned report.
pub(crate) async fn move_with_retry(ctx: Arc<MoveContext>, task: MoveTask) -> MoveReport {
    let attempts = ctx.settings.retry_attempts.max(1);
    let mut outcome = MoveOutcome::Exhausted { attempts };

    for attempt in 1..=attempts {
        match attempt_move(&ctx, &task, true).await {
            Ok(settled) => {
                outcome = settled;
                break;
            }
            Err(MoveError::NeedsRetry { title, reason }) => {
                debug!(
                    event = "core.restore.move_retry",
                    title = %title,
                    reason = reason,
                    attempt = attempt,
                    attempts = attempts
                );
                if attempt < attempts {
                    tokio::time::sleep(ctx.settings.retry_delay).await;
                }
            }
            Err(e) => {
                error!(
                    event = "core.restore.move_failed",
                    title = %task.record.window_title,
                    pid = ?task.pid,
                    error = %e
                );
                outcome = MoveOutcome::Failed {
                    message: e.to_string(),
                };
                break;
            }
        }
    }

    if let MoveOutcome::Exhausted { attempts } = outcome {
        warn!(
            event = "core.restore.move_exhausted",
            title = %task.record.window_title,
            pid = ?task.pid,
            attempts = attempts
        );
    }

    MoveReport {
        record: task.record,
        pid: task.pid,
        outcome,
    }
}
