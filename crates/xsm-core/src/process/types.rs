use chrono::{DateTime, Utc};

/// Metadata of a running process, as needed to relaunch it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    /// Full argv; empty when the kernel does not expose it (kernel threads,
    /// zombies, processes owned by other users on hardened systems)
    pub command_line: Vec<String>,
    pub create_time: Option<DateTime<Utc>>,
}
