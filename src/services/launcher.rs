//! Lifecycle control for the Hub launcher.
//!
//! The editor expects the Hub to be running for licensing when launched
//! interactively. A run starts the Hub only if it was not already running, and
//! stops it again afterwards only in that case.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::ffi::OsStr;
use std::sync::{Mutex, PoisonError};
use sysinfo::{Pid, Process, System};
use tokio::process::Command;

#[cfg(test)]
use mockall::automock;

/// Start, stop and probe the launcher process
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LauncherControl: Send + Sync {
    async fn is_running(&self) -> bool;

    async fn start(&self, path: Utf8PathBuf) -> std::io::Result<()>;

    /// Stop the launcher started by [`start`](Self::start), if any
    async fn stop(&self) -> std::io::Result<()>;
}

/// Executable name of the Hub when no `hub_path` is known
pub fn default_hub_executable() -> &'static str {
    if cfg!(target_os = "windows") {
        "Unity Hub.exe"
    } else if cfg!(target_os = "macos") {
        "Unity Hub"
    } else {
        "unityhub"
    }
}

/// Controls the launcher through the host process table.
///
/// Running instances are recognized by executable file name. Only the process
/// spawned by [`start`](LauncherControl::start) is ever stopped.
#[derive(Debug)]
pub struct SystemLauncher {
    executable: String,
    spawned: Mutex<Option<Pid>>,
}

impl SystemLauncher {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            spawned: Mutex::new(None),
        }
    }

    /// Launcher matching the file name of `hub_path`, or the platform's
    /// default Hub executable
    pub fn for_hub(hub_path: Option<&Utf8Path>) -> Self {
        let executable = hub_path
            .and_then(Utf8Path::file_name)
            .unwrap_or(default_hub_executable());
        Self::new(executable)
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// PID of the launcher this instance started and has not stopped yet
    pub fn spawned_pid(&self) -> Option<u32> {
        self.spawned_slot().map(Pid::as_u32)
    }

    fn spawned_slot(&self) -> Option<Pid> {
        *self.spawned.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_spawned(&self, pid: Option<Pid>) -> Option<Pid> {
        let mut slot = self.spawned.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, pid)
    }
}

#[async_trait]
impl LauncherControl for SystemLauncher {
    async fn is_running(&self) -> bool {
        let executable = self.executable.clone();
        match tokio::task::spawn_blocking(move || find_running(&executable)).await {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("Could not probe for {}: {}", self.executable, e);
                false
            }
        }
    }

    async fn start(&self, path: Utf8PathBuf) -> std::io::Result<()> {
        tracing::info!("Starting Hub: {}", path);
        // Detached: the Hub outlives this call and is stopped by PID later
        let child = Command::new(path.as_std_path())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()?;

        let pid = child.id().map(Pid::from_u32);
        if let Some(pid) = pid {
            tracing::debug!("Hub started with PID {}", pid);
        }
        self.set_spawned(pid);
        Ok(())
    }

    async fn stop(&self) -> std::io::Result<()> {
        let Some(pid) = self.set_spawned(None) else {
            tracing::debug!("No Hub started by this run; leaving {} alone", self.executable);
            return Ok(());
        };

        tracing::info!("Stopping Hub (PID {})", pid);
        let killed = tokio::task::spawn_blocking(move || {
            let system = System::new_all();
            system.process(pid).is_none_or(Process::kill)
        })
        .await
        .map_err(std::io::Error::other)?;

        if killed {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("failed to stop Hub (PID {})", pid)))
        }
    }
}

/// Whether any process runs an executable called `executable`
fn find_running(executable: &str) -> bool {
    let system = System::new_all();
    system.processes().values().any(|process| {
        process
            .exe()
            .and_then(|exe| exe.file_name())
            .into_iter()
            .chain([process.name()])
            .any(|name| same_executable(name, executable))
    })
}

fn same_executable(candidate: &OsStr, executable: &str) -> bool {
    let candidate = candidate.to_string_lossy();
    if cfg!(windows) {
        candidate.eq_ignore_ascii_case(executable)
    } else {
        candidate == executable
    }
}
