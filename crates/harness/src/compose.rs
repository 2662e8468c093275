//! Compose stack control and the platform image adapter
//!
//! The published Pinot image is x86-only; on ARM hosts the compose file
//! is rewritten in place to point at the `-arm64` tag before `up` and
//! restored to the original tag after `down`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::CommandSpec;
use crate::error::{HarnessError, HarnessResult};

/// Architectures that can run the stock Pinot image directly.
pub fn is_x86(arch: &str) -> bool {
    matches!(arch, "x86" | "x86_64")
}

/// Replace every occurrence of `from` with `to`, returning the rewritten
/// content only when something actually changed.
///
/// The arm tag extends the x86 tag, so an already-adapted file still
/// contains `from` as a substring of `to`; those embedded occurrences
/// must not be substituted a second time.
pub fn rewrite_image_tag(contents: &str, from: &str, to: &str) -> Option<String> {
    if to.contains(from) {
        let parts: Vec<&str> = contents.split(to).collect();
        if parts.iter().all(|p| !p.contains(from)) {
            return None;
        }
        let rewritten: Vec<String> = parts.iter().map(|p| p.replace(from, to)).collect();
        Some(rewritten.join(to))
    } else if contents.contains(from) {
        Some(contents.replace(from, to))
    } else {
        None
    }
}

/// Rewrites the compose file's Pinot image tag for the host platform.
pub struct PlatformAdapter {
    compose_file: PathBuf,
    x86_tag: String,
    arm_tag: String,
}

impl PlatformAdapter {
    pub fn new(compose_file: &Path, x86_tag: &str, arm_tag: &str) -> Self {
        Self {
            compose_file: compose_file.to_path_buf(),
            x86_tag: x86_tag.to_string(),
            arm_tag: arm_tag.to_string(),
        }
    }

    /// Apply the substitution for the host architecture. Returns whether
    /// the file was rewritten.
    pub fn apply(&self, revert: bool) -> HarnessResult<bool> {
        self.apply_for_arch(std::env::consts::ARCH, revert)
    }

    /// Architecture-parameterized variant, used directly by tests.
    pub fn apply_for_arch(&self, arch: &str, revert: bool) -> HarnessResult<bool> {
        if is_x86(arch) {
            return Ok(false);
        }

        let (from, to) = if revert {
            (&self.arm_tag, &self.x86_tag)
        } else {
            (&self.x86_tag, &self.arm_tag)
        };

        let contents = fs::read_to_string(&self.compose_file)?;

        match rewrite_image_tag(&contents, from, to) {
            Some(rewritten) => {
                info!(
                    "Rewriting {} image tag for {} host ({} -> {})",
                    self.compose_file.display(),
                    arch,
                    from,
                    to
                );
                fs::write(&self.compose_file, rewritten)?;
                Ok(true)
            }
            None => {
                debug!("No '{}' occurrence in {}", from, self.compose_file.display());
                Ok(false)
            }
        }
    }
}

/// Brings the compose stack up and down in the compose file's directory.
pub struct ComposeStack {
    dir: PathBuf,
    up: CommandSpec,
    down: CommandSpec,
}

impl ComposeStack {
    pub fn new(compose_file: &Path, up: CommandSpec, down: CommandSpec) -> Self {
        let dir = compose_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir, up, down }
    }

    pub fn up(&self) -> HarnessResult<()> {
        self.exec(&self.up)
    }

    pub fn down(&self) -> HarnessResult<()> {
        self.exec(&self.down)
    }

    fn exec(&self, spec: &CommandSpec) -> HarnessResult<()> {
        info!("Running {} {} in {}", spec.program, spec.args.join(" "), self.dir.display());

        let status = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&self.dir)
            .status()
            .map_err(|e| HarnessError::Compose(format!("failed to spawn {}: {}", spec.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(HarnessError::Compose(format!(
                "{} {} exited with {}",
                spec.program,
                spec.args.join(" "),
                status
            )))
        }
    }
}
