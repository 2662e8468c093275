//! Cypress invocation in the UI project directory

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::config::CommandSpec;
use crate::error::{HarnessError, HarnessResult};

/// How the test runner is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CypressMode {
    /// Interactive runner UI.
    Open,
    /// Headless, for pipelines.
    Run,
}

impl CypressMode {
    pub fn from_run_only(run_only: bool) -> Self {
        if run_only {
            CypressMode::Run
        } else {
            CypressMode::Open
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            CypressMode::Open => "open",
            CypressMode::Run => "run",
        }
    }
}

pub struct CypressRunner {
    command: CommandSpec,
    ui_dir: PathBuf,
}

impl CypressRunner {
    pub fn new(command: CommandSpec, ui_dir: &Path) -> Self {
        Self {
            command,
            ui_dir: ui_dir.to_path_buf(),
        }
    }

    /// Verify the runner binary is reachable before the suite starts.
    pub fn check_installed(&self) -> HarnessResult<()> {
        let status = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg("--version")
            .current_dir(&self.ui_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(HarnessError::CypressNotFound),
        }
    }

    /// Run the suite; Cypress output goes straight to the terminal.
    pub fn run(&self, mode: CypressMode) -> HarnessResult<()> {
        info!(
            "Starting cypress {} in {}",
            mode.verb(),
            self.ui_dir.display()
        );

        let status = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(mode.verb())
            .current_dir(&self.ui_dir)
            .status()
            .map_err(|e| HarnessError::CypressFailed(format!("failed to spawn: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(HarnessError::CypressFailed(status.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_only_flag_selects_the_verb() {
        assert_eq!(CypressMode::from_run_only(true), CypressMode::Run);
        assert_eq!(CypressMode::from_run_only(false), CypressMode::Open);
        assert_eq!(CypressMode::Run.verb(), "run");
        assert_eq!(CypressMode::Open.verb(), "open");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_a_failure() {
        let runner = CypressRunner::new(CommandSpec::new("false", &[]), Path::new("."));
        let err = runner.run(CypressMode::Run).unwrap_err();
        assert!(matches!(err, HarnessError::CypressFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_a_pass() {
        let runner = CypressRunner::new(CommandSpec::new("true", &[]), Path::new("."));
        runner.run(CypressMode::Run).unwrap();
    }
}
