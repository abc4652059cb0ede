use crate::errors::XsmError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Session file [{path}] was not found.")]
    NotFound { name: String, path: String },

    #[error("Session file [{path}] is invalid: {message}")]
    InvalidSession { path: String, message: String },

    #[error("Failed to serialize session: {message}")]
    SerializeFailed { message: String },

    #[error("Failed to {action} [{path}]: {source}")]
    IoError {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl XsmError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::InvalidName { .. } => "SESSION_INVALID_NAME",
            SessionError::NotFound { .. } => "SESSION_NOT_FOUND",
            SessionError::InvalidSession { .. } => "SESSION_INVALID",
            SessionError::SerializeFailed { .. } => "SESSION_SERIALIZE_FAILED",
            SessionError::IoError { .. } => "SESSION_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidName { .. }
                | SessionError::NotFound { .. }
                | SessionError::InvalidSession { .. }
        )
    }
}
