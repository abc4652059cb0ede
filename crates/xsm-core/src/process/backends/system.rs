//! Process table backed by `sysinfo`.

use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, info, warn};

use crate::process::errors::ProcessError;
use crate::process::traits::ProcessTable;
use crate::process::types::ProcessInfo;

/// Process table of the local machine.
///
/// Every call takes a fresh snapshot; processes come and go quickly while a
/// session is being restored.
pub struct SystemProcessTable;

impl SystemProcessTable {
    fn snapshot(&self, processes: ProcessesToUpdate<'_>, with_cmd: bool) -> System {
        let refresh = if with_cmd {
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always)
        } else {
            ProcessRefreshKind::nothing()
        };
        let mut system = System::new();
        system.refresh_processes_specifics(processes, true, refresh);
        system
    }
}

fn command_line_of(process: &Process) -> Vec<String> {
    process
        .cmd()
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

impl ProcessTable for SystemProcessTable {
    fn lookup(&self, pid: u32) -> Result<ProcessInfo, ProcessError> {
        let sys_pid = Pid::from_u32(pid);
        let system = self.snapshot(ProcessesToUpdate::Some(&[sys_pid]), true);
        let process = system
            .process(sys_pid)
            .ok_or(ProcessError::NoSuchProcess { pid })?;

        let create_time: Option<DateTime<Utc>> =
            i64::try_from(process.start_time())
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0));

        Ok(ProcessInfo {
            pid,
            name: process.name().to_string_lossy().into_owned(),
            command_line: command_line_of(process),
            create_time,
        })
    }

    fn children(&self, pid: u32) -> Vec<u32> {
        let parent = Pid::from_u32(pid);
        let system = self.snapshot(ProcessesToUpdate::All, false);
        let mut children: Vec<u32> = system
            .processes()
            .iter()
            .filter(|(_, process)| process.parent() == Some(parent))
            .map(|(child, _)| child.as_u32())
            .collect();
        children.sort_unstable();
        children
    }

    fn find_by_command_line(&self, command_line: &[String]) -> Option<u32> {
        if command_line.is_empty() {
            return None;
        }

        let system = self.snapshot(ProcessesToUpdate::All, true);
        let mut matches: Vec<u32> = system
            .processes()
            .iter()
            .filter(|(_, process)| {
                let cmd = process.cmd();
                cmd.len() == command_line.len()
                    && cmd
                        .iter()
                        .zip(command_line)
                        .all(|(actual, expected)| actual.to_string_lossy() == expected.as_str())
            })
            .map(|(pid, _)| pid.as_u32())
            .collect();
        // HashMap order is arbitrary; the oldest (lowest) pid is the stable choice
        matches.sort_unstable();
        matches.first().copied()
    }

    fn launch(&self, command_line: &[String]) -> Result<u32, ProcessError> {
        let (program, args) = command_line
            .split_first()
            .ok_or(ProcessError::EmptyCommandLine)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group so the application survives the CLI's Ctrl-C
            command.process_group(0);
        }

        let mut child = command.spawn().map_err(|e| ProcessError::LaunchFailed {
            program: program.clone(),
            message: e.to_string(),
        })?;
        let pid = child.id();

        info!(
            event = "core.process.launched",
            pid = pid,
            program = %program
        );

        // Reap the child when it exits so it does not linger as a zombie
        let reaper = std::thread::Builder::new()
            .name(format!("xsm-reap-{}", pid))
            .spawn(move || match child.wait() {
                Ok(status) => debug!(event = "core.process.exited", pid = pid, status = %status),
                Err(e) => debug!(event = "core.process.wait_failed", pid = pid, error = %e),
            });
        if let Err(e) = reaper {
            warn!(event = "core.process.reaper_spawn_failed", pid = pid, error = %e);
        }

        Ok(pid)
    }
}
