//! Capture, save and restore X11 desktop sessions.

pub mod close;
pub mod config;
pub mod errors;
pub mod filters;
pub mod logging;
pub mod process;
pub mod restore;
pub mod sessions;
pub mod snapshot;
pub mod window;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use close::{CloseError, CloseReport, close_windows};
pub use config::{ConfigError, XsmConfig, load_config};
pub use errors::{XsmError, XsmResult, log_error};
pub use filters::{ExcludeApps, FilterPipeline, IncludeApps, SessionFilter, SortByDesktop};
pub use logging::init_logging;
pub use restore::{RestoreError, RestoreReconciler, RestoreReport, RestoreSettings};
pub use sessions::{SessionConfig, SessionError, SessionStore, WindowRecord};
pub use snapshot::{SnapshotError, capture, capture_filtered};
pub use window::{WindowId, WindowManager, WmctrlBackend};
