use crate::errors::XsmError;

use super::types::WindowId;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Window manager tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("Failed to enumerate windows: {message}")]
    EnumerationFailed { message: String },

    #[error("Failed to move window {window_id} to desktop {desktop}: {message}")]
    MoveFailed {
        window_id: WindowId,
        desktop: u32,
        message: String,
    },

    #[error("Failed to close window {window_id}: {message}")]
    CloseFailed { window_id: WindowId, message: String },
}

impl XsmError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::ToolNotFound { .. } => "WINDOW_TOOL_NOT_FOUND",
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::MoveFailed { .. } => "WINDOW_MOVE_FAILED",
            WindowError::CloseFailed { .. } => "WINDOW_CLOSE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WindowError::ToolNotFound { .. })
    }
}
