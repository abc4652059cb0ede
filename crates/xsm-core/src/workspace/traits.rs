//! Workspace control trait definition.

use super::errors::WorkspaceError;

/// Control over the desktop environment's virtual desktops.
pub trait WorkspaceControl: Send + Sync {
    /// Whether this desktop environment exposes workspace configuration at all.
    /// When false, every other method may be left unimplemented.
    fn is_managed(&self) -> bool;

    /// Number of workspaces that currently exist.
    fn workspace_count(&self) -> Result<u32, WorkspaceError>;

    /// Whether workspaces are created and removed on demand.
    fn dynamic_workspaces(&self) -> Result<bool, WorkspaceError>;

    /// Set the fixed workspace count.
    fn set_workspace_count(&self, count: u32) -> Result<(), WorkspaceError>;

    fn enable_dynamic_workspaces(&self) -> Result<(), WorkspaceError>;

    fn disable_dynamic_workspaces(&self) -> Result<(), WorkspaceError>;
}
