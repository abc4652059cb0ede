use crate::errors::XsmError;
use crate::window::WindowError;

#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("Failed to start worker pool: {message}")]
    WorkerPoolFailed { message: String },

    #[error("Failed to start detached restore: {message}")]
    SpawnFailed { message: String },

    #[error("Restore task panicked")]
    TaskPanicked,
}

impl XsmError for RestoreError {
    fn error_code(&self) -> &'static str {
        match self {
            RestoreError::WorkerPoolFailed { .. } => "RESTORE_WORKER_POOL_FAILED",
            RestoreError::SpawnFailed { .. } => "RESTORE_SPAWN_FAILED",
            RestoreError::TaskPanicked => "RESTORE_TASK_PANICKED",
        }
    }
}

/// Failure of a single move attempt.
///
/// `NeedsRetry` is the only variant the retry loop retries; it never leaves
/// the restore module.
#[derive(Debug, thiserror::Error)]
pub(crate) enum MoveError {
    #[error("window '{title}' not ready: {reason}")]
    NeedsRetry { title: String, reason: &'static str },

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("window manager call did not complete: {message}")]
    Blocking { message: String },
}

impl From<tokio::task::JoinError> for MoveError {
    fn from(error: tokio::task::JoinError) -> Self {
        MoveError::Blocking {
            message: error.to_string(),
        }
    }
}
