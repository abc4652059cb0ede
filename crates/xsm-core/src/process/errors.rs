use crate::errors::XsmError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("No such process: {pid}")]
    NoSuchProcess { pid: u32 },

    #[error("Cannot launch an empty command line")]
    EmptyCommandLine,

    #[error("Failed to launch '{program}': {message}")]
    LaunchFailed { program: String, message: String },
}

impl XsmError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::NoSuchProcess { .. } => "PROCESS_NOT_FOUND",
            ProcessError::EmptyCommandLine => "PROCESS_EMPTY_COMMAND_LINE",
            ProcessError::LaunchFailed { .. } => "PROCESS_LAUNCH_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ProcessError::EmptyCommandLine)
    }
}
