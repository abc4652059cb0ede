//! Window manager backend trait definition.

use super::errors::WindowError;
use super::types::{RunningWindow, WindowId};

/// Interface to the window manager.
///
/// Implementations only orchestrate existing enumeration and placement
/// primitives; none of the calls are assumed to be atomic on the window
/// manager side.
pub trait WindowManager: Send + Sync {
    /// The canonical name of this backend (e.g., "wmctrl").
    fn name(&self) -> &'static str;

    /// Check if the backend's tooling is available on the system.
    fn is_available(&self) -> bool;

    /// Enumerate the current top-level windows.
    fn list_windows(&self) -> Result<Vec<RunningWindow>, WindowError>;

    /// Ask the window manager to move a window to a desktop.
    ///
    /// Fire-and-forget: success only means the request was issued.
    fn move_to_desktop(&self, window_id: WindowId, desktop: u32) -> Result<(), WindowError>;

    /// Ask a window to close itself the way its close button would.
    fn close_gracefully(&self, window_id: WindowId) -> Result<(), WindowError>;
}
