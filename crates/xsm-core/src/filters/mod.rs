//! Composable filters over captured or loaded window records.
//!
//! The same [`FilterPipeline`] is used when capturing (save, close) and when
//! restoring or moving. Slots may be empty so optional filters can be wired
//! in without branching at every call site.

use tracing::debug;

use crate::sessions::WindowRecord;

/// A pure transformation of a record list. May drop, reorder or rewrite.
pub trait SessionFilter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn apply(&self, records: Vec<WindowRecord>) -> Vec<WindowRecord>;
}

/// Ordered list of optional filters, each consuming the previous output.
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Option<Box<dyn SessionFilter>>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter slot. `None` is kept as a no-op slot.
    pub fn with(mut self, filter: Option<Box<dyn SessionFilter>>) -> Self {
        self.push(filter);
        self
    }

    pub fn push(&mut self, filter: Option<Box<dyn SessionFilter>>) {
        self.filters.push(filter);
    }

    /// Number of filters that will actually run.
    pub fn active_len(&self) -> usize {
        self.filters.iter().flatten().count()
    }

    pub fn apply(&self, records: Vec<WindowRecord>) -> Vec<WindowRecord> {
        self.filters
            .iter()
            .flatten()
            .fold(records, |records, filter| {
                let before = records.len();
                let after = filter.apply(records);
                debug!(
                    event = "core.filter.applied",
                    filter = filter.name(),
                    before = before,
                    after = after.len()
                );
                after
            })
    }
}

fn normalize(names: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Whether a record belongs to one of `names` (lowercased).
///
/// Compares against the process name and the executable's file name, since
/// process names are truncated by the kernel.
fn matches_app(record: &WindowRecord, names: &[String]) -> bool {
    let app = record.application_name.to_lowercase();
    let executable = record
        .command_line
        .first()
        .map(|program| program.rsplit('/').next().unwrap_or(program).to_lowercase());

    names
        .iter()
        .any(|name| *name == app || executable.as_deref() == Some(name.as_str()))
}

/// Drop records of the named applications.
pub struct ExcludeApps {
    names: Vec<String>,
}

impl ExcludeApps {
    /// `None` when `names` is empty, so the slot is skipped.
    pub fn from_names(
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Option<Box<dyn SessionFilter>> {
        let names = normalize(names);
        if names.is_empty() {
            return None;
        }
        Some(Box::new(Self { names }))
    }
}

impl SessionFilter for ExcludeApps {
    fn name(&self) -> &'static str {
        "exclude_apps"
    }

    fn apply(&self, records: Vec<WindowRecord>) -> Vec<WindowRecord> {
        records
            .into_iter()
            .filter(|r| !matches_app(r, &self.names))
            .collect()
    }
}

/// Keep only records of the named applications.
pub struct IncludeApps {
    names: Vec<String>,
}

impl IncludeApps {
    /// `None` when `names` is empty, so the slot is skipped.
    pub fn from_names(
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Option<Box<dyn SessionFilter>> {
        let names = normalize(names);
        if names.is_empty() {
            return None;
        }
        Some(Box::new(Self { names }))
    }
}

impl SessionFilter for IncludeApps {
    fn name(&self) -> &'static str {
        "include_apps"
    }

    fn apply(&self, records: Vec<WindowRecord>) -> Vec<WindowRecord> {
        records
            .into_iter()
            .filter(|r| matches_app(r, &self.names))
            .collect()
    }
}

/// Stable sort by desktop number.
pub struct SortByDesktop;

impl SessionFilter for SortByDesktop {
    fn name(&self) -> &'static str {
        "sort_by_desktop"
    }

    fn apply(&self, mut records: Vec<WindowRecord>) -> Vec<WindowRecord> {
        records.sort_by_key(|r| r.desktop_number);
        records
    }
}
