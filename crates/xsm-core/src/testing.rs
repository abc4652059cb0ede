//! In-memory collaborators for tests.
//!
//! Every fake records the calls it receives so tests can assert on the exact
//! side effects a restore produced.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};

use crate::process::{ProcessError, ProcessInfo, ProcessTable};
use crate::sessions::WindowRecord;
use crate::window::{RunningWindow, WindowError, WindowId, WindowManager};
use crate::workspace::{WorkspaceControl, WorkspaceError};

/// Build a record the way a capture would.
pub(crate) fn record(
    pid: u32,
    window_id: u64,
    title: &str,
    desktop: u32,
    command_line: &[&str],
) -> WindowRecord {
    WindowRecord {
        process_id: pid,
        window_id: WindowId::new(window_id),
        window_id_int: Some(window_id),
        window_title: title.to_string(),
        desktop_number: desktop,
        application_name: command_line
            .first()
            .map(|program| program.rsplit('/').next().unwrap_or(program).to_string())
            .unwrap_or_default(),
        command_line: command_line.iter().map(|s| s.to_string()).collect(),
        process_create_time: None,
    }
}

pub(crate) fn window(id: u64, desktop: Option<u32>, title: &str, pid: u32) -> RunningWindow {
    RunningWindow {
        window_id: WindowId::new(id),
        desktop,
        title: title.to_string(),
        process_id: pid,
    }
}

#[derive(Default)]
pub(crate) struct FakeWindowManager {
    windows: Mutex<Vec<RunningWindow>>,
    moves: Mutex<Vec<(WindowId, u32)>>,
    closes: Mutex<Vec<WindowId>>,
    list_calls: Mutex<Vec<Instant>>,
    fail_listing: AtomicBool,
    fail_moves: AtomicBool,
    ignore_moves: AtomicBool,
    list_delay: Mutex<Duration>,
}

impl FakeWindowManager {
    pub(crate) fn with_windows(windows: Vec<RunningWindow>) -> Self {
        Self {
            windows: Mutex::new(windows),
            ..Default::default()
        }
    }

    pub(crate) fn add_window(&self, window: RunningWindow) {
        self.windows.lock().unwrap().push(window);
    }

    pub(crate) fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_moves(&self, fail: bool) {
        self.fail_moves.store(fail, Ordering::SeqCst);
    }

    /// Accept move commands without changing the window's desktop, like a
    /// window manager that has not processed the request yet.
    pub(crate) fn set_ignore_moves(&self, ignore: bool) {
        self.ignore_moves.store(ignore, Ordering::SeqCst);
    }

    /// Make every listing block the calling thread, like a slow `wmctrl`.
    pub(crate) fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = delay;
    }

    pub(crate) fn moves(&self) -> Vec<(WindowId, u32)> {
        self.moves.lock().unwrap().clone()
    }

    pub(crate) fn closes(&self) -> Vec<WindowId> {
        self.closes.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> Vec<Instant> {
        self.list_calls.lock().unwrap().clone()
    }

    pub(crate) fn desktop_of(&self, id: u64) -> Option<u32> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.window_id == WindowId::new(id))
            .and_then(|w| w.desktop)
    }
}

impl WindowManager for FakeWindowManager {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn list_windows(&self) -> Result<Vec<RunningWindow>, WindowError> {
        self.list_calls.lock().unwrap().push(Instant::now());
        let delay = *self.list_delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(WindowError::EnumerationFailed {
                message: "display went away".to_string(),
            });
        }
        Ok(self.windows.lock().unwrap().clone())
    }

    fn move_to_desktop(&self, window_id: WindowId, desktop: u32) -> Result<(), WindowError> {
        if self.fail_moves.load(Ordering::SeqCst) {
            return Err(WindowError::MoveFailed {
                window_id,
                desktop,
                message: "BadWindow".to_string(),
            });
        }
        self.moves.lock().unwrap().push((window_id, desktop));
        if self.ignore_moves.load(Ordering::SeqCst) {
            return Ok(());
        }
        for window in self.windows.lock().unwrap().iter_mut() {
            if window.window_id == window_id {
                window.desktop = Some(desktop);
            }
        }
        Ok(())
    }

    fn close_gracefully(&self, window_id: WindowId) -> Result<(), WindowError> {
        self.closes.lock().unwrap().push(window_id);
        Ok(())
    }
}

/// Process table whose launches hand out sequential pids starting at 1000.
pub(crate) struct FakeProcessTable {
    next_pid: AtomicU32,
    processes: Mutex<HashMap<u32, ProcessInfo>>,
    children: Mutex<HashMap<u32, Vec<u32>>>,
    launched: Mutex<Vec<Vec<String>>>,
}

impl Default for FakeProcessTable {
    fn default() -> Self {
        Self {
            next_pid: AtomicU32::new(1000),
            processes: Mutex::new(HashMap::new()),
            children: Mutex::new(HashMap::new()),
            launched: Mutex::new(Vec::new()),
        }
    }
}

impl FakeProcessTable {
    pub(crate) fn add_process(&self, pid: u32, name: &str, command_line: &[&str]) {
        self.processes.lock().unwrap().insert(
            pid,
            ProcessInfo {
                pid,
                name: name.to_string(),
                command_line: command_line.iter().map(|s| s.to_string()).collect(),
                create_time: None,
            },
        );
    }

    pub(crate) fn add_child(&self, parent: u32, child: u32) {
        self.children
            .lock()
            .unwrap()
            .entry(parent)
            .or_default()
            .push(child);
    }

    pub(crate) fn launched(&self) -> Vec<Vec<String>> {
        self.launched.lock().unwrap().clone()
    }
}

impl ProcessTable for FakeProcessTable {
    fn lookup(&self, pid: u32) -> Result<ProcessInfo, ProcessError> {
        self.processes
            .lock()
            .unwrap()
            .get(&pid)
            .cloned()
            .ok_or(ProcessError::NoSuchProcess { pid })
    }

    fn children(&self, pid: u32) -> Vec<u32> {
        self.children
            .lock()
            .unwrap()
            .get(&pid)
            .cloned()
            .unwrap_or_default()
    }

    fn find_by_command_line(&self, command_line: &[String]) -> Option<u32> {
        let processes = self.processes.lock().unwrap();
        let mut pids: Vec<u32> = processes
            .values()
            .filter(|p| p.command_line == command_line)
            .map(|p| p.pid)
            .collect();
        pids.sort_unstable();
        pids.first().copied()
    }

    fn launch(&self, command_line: &[String]) -> Result<u32, ProcessError> {
        if command_line.is_empty() {
            return Err(ProcessError::EmptyCommandLine);
        }
        if command_line[0].starts_with("/missing/") {
            return Err(ProcessError::LaunchFailed {
                program: command_line[0].clone(),
                message: "No such file or directory (os error 2)".to_string(),
            });
        }
        self.launched.lock().unwrap().push(command_line.to_vec());
        Ok(self.next_pid.fetch_add(1, Ordering::SeqCst))
    }
}

pub(crate) struct FakeWorkspaces {
    managed: bool,
    count: Mutex<u32>,
    dynamic: Mutex<bool>,
    fail_set_count: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeWorkspaces {
    pub(crate) fn new(managed: bool, count: u32, dynamic: bool) -> Self {
        Self {
            managed,
            count: Mutex::new(count),
            dynamic: Mutex::new(dynamic),
            fail_set_count: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn unmanaged() -> Self {
        Self::new(false, 1, false)
    }

    pub(crate) fn set_fail_set_count(&self, fail: bool) {
        self.fail_set_count.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn count(&self) -> u32 {
        *self.count.lock().unwrap()
    }

    pub(crate) fn is_dynamic(&self) -> bool {
        *self.dynamic.lock().unwrap()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl WorkspaceControl for FakeWorkspaces {
    fn is_managed(&self) -> bool {
        self.managed
    }

    fn workspace_count(&self) -> Result<u32, WorkspaceError> {
        Ok(self.count())
    }

    fn dynamic_workspaces(&self) -> Result<bool, WorkspaceError> {
        Ok(self.is_dynamic())
    }

    fn set_workspace_count(&self, count: u32) -> Result<(), WorkspaceError> {
        if self.fail_set_count.load(Ordering::SeqCst) {
            return Err(WorkspaceError::UpdateFailed {
                message: "read-only schema".to_string(),
            });
        }
        self.log(format!("set_count {}", count));
        *self.count.lock().unwrap() = count;
        Ok(())
    }

    fn enable_dynamic_workspaces(&self) -> Result<(), WorkspaceError> {
        self.log("enable_dynamic");
        *self.dynamic.lock().unwrap() = true;
        Ok(())
    }

    fn disable_dynamic_workspaces(&self) -> Result<(), WorkspaceError> {
        self.log("disable_dynamic");
        *self.dynamic.lock().unwrap() = false;
        Ok(())
    }
}
