//! Launch contract for the backend and frontend services
//!
//! The harness only knows how to spawn a configured command in a
//! directory and keep the resulting child around for teardown; what the
//! command does to build or start the service is its own business.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::CommandSpec;
use crate::error::{HarnessError, HarnessResult};

/// Starts a long-running service from a project directory.
pub trait ServiceLauncher {
    fn launch(&self, dir: &Path) -> HarnessResult<ServiceHandle>;
}

/// Spawns a fixed command line in the given directory.
pub struct CommandLauncher {
    name: String,
    command: CommandSpec,
}

impl CommandLauncher {
    pub fn new(name: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }
}

impl ServiceLauncher for CommandLauncher {
    fn launch(&self, dir: &Path) -> HarnessResult<ServiceHandle> {
        info!(
            "Launching {}: {} {} (cwd {})",
            self.name,
            self.command.program,
            self.command.args.join(" "),
            dir.display()
        );

        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HarnessError::Launch {
                service: self.name.clone(),
                reason: format!("failed to spawn {}: {}", self.command.program, e),
            })?;

        Ok(ServiceHandle {
            name: self.name.clone(),
            child,
        })
    }
}

/// Handle to a launched service process.
///
/// The harness never joins the child during a run; the handle exists so
/// teardown can terminate it by its recorded pid instead of rediscovering
/// it through the process table.
#[derive(Debug)]
pub struct ServiceHandle {
    name: String,
    child: Child,
}

impl ServiceHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Terminate the service: SIGTERM, a short grace period, then SIGKILL.
    pub fn stop(&mut self) {
        // Already exited on its own?
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return;
        }

        info!("Stopping {} (pid {})", self.name, self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        if let Err(e) = self.child.kill() {
            warn!("Failed to kill {}: {}", self.name, e);
        }
        let _ = self.child.wait();
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn launch_and_stop_a_long_running_child() {
        let launcher = CommandLauncher::new("sleeper", CommandSpec::new("sleep", &["600"]));
        let mut handle = launcher.launch(Path::new(".")).unwrap();
        assert!(handle.pid() > 0);
        handle.stop();
        // A second stop is a no-op once the child has been reaped
        handle.stop();
    }

    #[test]
    fn launch_failure_names_the_service() {
        let launcher = CommandLauncher::new(
            "backend",
            CommandSpec::new("definitely-not-a-real-binary", &[]),
        );
        let err = launcher.launch(Path::new(".")).unwrap_err();
        match err {
            HarnessError::Launch { service, .. } => assert_eq!(service, "backend"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
