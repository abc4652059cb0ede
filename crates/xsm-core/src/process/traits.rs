//! Process table trait definition.

use super::errors::ProcessError;
use super::types::ProcessInfo;

/// Access to the operating system's process table.
pub trait ProcessTable: Send + Sync {
    /// Look up a process by pid.
    ///
    /// Fails with [`ProcessError::NoSuchProcess`] when the process is gone.
    fn lookup(&self, pid: u32) -> Result<ProcessInfo, ProcessError>;

    /// Direct children of `pid`. Empty when the process is gone.
    fn children(&self, pid: u32) -> Vec<u32>;

    /// First running process whose full command line equals `command_line`.
    fn find_by_command_line(&self, command_line: &[String]) -> Option<u32>;

    /// Start `command_line` as a new detached process and return its pid.
    fn launch(&self, command_line: &[String]) -> Result<u32, ProcessError>;
}
