//! Scoped workspace capacity.
//!
//! A restore may need more desktops than currently exist. [`ensure_capacity`]
//! creates them and returns a [`CapacityGuard`]; when workspaces were
//! dynamically sized before, dropping the guard turns dynamic sizing back on,
//! whether the restore succeeded, failed or panicked.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::errors::WorkspaceError;
use super::traits::WorkspaceControl;

/// Keeps the raised workspace count alive until dropped.
#[must_use = "dropping the guard immediately restores dynamic workspaces"]
pub struct CapacityGuard {
    restore_dynamic: Option<Arc<dyn WorkspaceControl>>,
}

impl CapacityGuard {
    fn noop() -> Self {
        Self {
            restore_dynamic: None,
        }
    }

    /// Whether dropping this guard re-enables dynamic workspaces.
    pub fn restores_dynamic(&self) -> bool {
        self.restore_dynamic.is_some()
    }
}

impl Drop for CapacityGuard {
    fn drop(&mut self) {
        let Some(control) = self.restore_dynamic.take() else {
            return;
        };
        match control.enable_dynamic_workspaces() {
            Ok(()) => info!(event = "core.workspace.dynamic_restored"),
            Err(e) => error!(
                event = "core.workspace.dynamic_restore_failed",
                error = %e,
                "Dynamic workspaces could not be re-enabled"
            ),
        }
    }
}

/// Make sure at least `required` workspaces exist.
///
/// - Unmanaged desktop environment: no-op.
/// - Enough workspaces already: no-op.
/// - Dynamic workspaces: switch to a fixed count of `required`; the guard
///   re-enables dynamic sizing on drop.
/// - Fixed workspaces: raise the count permanently.
pub fn ensure_capacity(
    control: &Arc<dyn WorkspaceControl>,
    required: u32,
) -> Result<CapacityGuard, WorkspaceError> {
    if !control.is_managed() {
        debug!(
            event = "core.workspace.capacity_skipped",
            reason = "desktop environment not managed"
        );
        return Ok(CapacityGuard::noop());
    }

    let current = control.workspace_count()?;
    if current >= required {
        debug!(
            event = "core.workspace.capacity_sufficient",
            current = current,
            required = required
        );
        return Ok(CapacityGuard::noop());
    }

    info!(
        event = "core.workspace.capacity_raise_started",
        current = current,
        required = required
    );

    if control.dynamic_workspaces()? {
        control.disable_dynamic_workspaces()?;
        // Owned from here: an early return below still re-enables dynamic sizing
        let guard = CapacityGuard {
            restore_dynamic: Some(Arc::clone(control)),
        };
        control.set_workspace_count(required)?;
        info!(
            event = "core.workspace.capacity_raised",
            count = required,
            temporary = true
        );
        Ok(guard)
    } else {
        control.set_workspace_count(required)?;
        info!(
            event = "core.workspace.capacity_raised",
            count = required,
            temporary = false
        );
        Ok(CapacityGuard::noop())
    }
}
