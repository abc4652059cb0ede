use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::WindowId;

/// One captured window: who owns it, how to relaunch it, where it lives.
///
/// Fields are declared in the order they are written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WindowRecord {
    pub application_name: String,
    /// Full argv of the owning process; empty means the window cannot be relaunched
    pub command_line: Vec<String>,
    pub desktop_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_create_time: Option<DateTime<Utc>>,
    /// Pid at capture time. Not stable across a relaunch.
    pub process_id: u32,
    pub window_id: WindowId,
    /// Integer form of `window_id` for tools that do not parse hex strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id_int: Option<u64>,
    /// Secondary identity key; window handles never survive a relaunch
    pub window_title: String,
}

impl WindowRecord {
    pub fn is_restorable(&self) -> bool {
        !self.command_line.is_empty()
    }
}

/// A named snapshot of windows in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionConfig {
    /// Set only on the copies kept in the backup directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_create_time: Option<DateTime<Utc>>,
    pub session_name: String,
    pub window_records: Vec<WindowRecord>,
}

impl SessionConfig {
    pub fn new(session_name: impl Into<String>, window_records: Vec<WindowRecord>) -> Self {
        Self {
            session_name: session_name.into(),
            window_records,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.window_records.is_empty()
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for record in &self.window_records {
            if let Some(int) = record.window_id_int
                && int != record.window_id.as_u64()
            {
                return Err(format!(
                    "windowIdInt {} does not match windowId {}",
                    int, record.window_id
                ));
            }
            if !seen.insert(record.window_id) {
                return Err(format!(
                    "duplicate windowId {} in windowRecords",
                    record.window_id
                ));
            }
        }
        Ok(())
    }
}

/// Keep only the first record of every process, preserving order.
pub fn dedup_by_process(records: Vec<WindowRecord>) -> Vec<WindowRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.process_id))
        .collect()
}

/// Summary of a stored session, used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub window_count: usize,
    pub session_create_time: Option<DateTime<Utc>>,
}

/// A file in the sessions directory and what reading it produced.
#[derive(Debug, Clone)]
pub struct SessionListing {
    pub name: String,
    pub summary: Result<SessionSummary, String>,
}
