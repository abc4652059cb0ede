//! Relaunch a saved session and put every window back on its desktop.
//!
//! Launching is sequential with a fixed pause; each launched record gets a
//! move task on the [`WorkerPool`] that polls the window list until the new
//! window shows up with its recorded title.

mod errors;
mod handler;
mod moved;
mod mover;
mod pool;
mod types;

pub use errors::RestoreError;
pub use handler::{DetachedRestore, RestoreReconciler};
pub use moved::MovedWindows;
pub use pool::WorkerPool;
pub use types::{
    LaunchFailure, MoveOutcome, MoveReport, MoveTask, RestoreReport, RestoreSettings,
};
