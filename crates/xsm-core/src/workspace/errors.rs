use crate::errors::XsmError;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Failed to query workspaces: {message}")]
    QueryFailed { message: String },

    #[error("Failed to change workspace settings: {message}")]
    UpdateFailed { message: String },
}

impl XsmError for WorkspaceError {
    fn error_code(&self) -> &'static str {
        match self {
            WorkspaceError::QueryFailed { .. } => "WORKSPACE_QUERY_FAILED",
            WorkspaceError::UpdateFailed { .. } => "WORKSPACE_UPDATE_FAILED",
        }
    }
}
