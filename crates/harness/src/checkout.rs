//! Fresh backend checkout in a per-run temporary directory

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;
use tracing::info;

use crate::config::CommandSpec;
use crate::error::{HarnessError, HarnessResult};

/// A cloned backend source tree. Dropping it removes the checkout.
#[derive(Debug)]
pub struct BackendCheckout {
    // Held for its Drop; the clone lives inside it.
    _temp: TempDir,
    path: PathBuf,
}

impl BackendCheckout {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Clone the backend repository into a fresh temporary directory.
///
/// Clone output is suppressed; a non-zero exit is fatal.
pub fn clone_backend(git: &CommandSpec, url: &str) -> HarnessResult<BackendCheckout> {
    let temp = TempDir::new()?;

    info!("Cloning {} into {}", url, temp.path().display());

    let status = Command::new(&git.program)
        .args(&git.args)
        .arg(url)
        .current_dir(temp.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| HarnessError::Clone {
            url: url.to_string(),
            reason: format!("failed to spawn {}: {}", git.program, e),
        })?;

    if !status.success() {
        return Err(HarnessError::Clone {
            url: url.to_string(),
            reason: format!("exited with {}", status),
        });
    }

    let path = temp.path().join(repo_dir_name(url));
    Ok(BackendCheckout { _temp: temp, path })
}

/// Directory name git derives from a clone URL.
fn repo_dir_name(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_dir_name_strips_git_suffix() {
        assert_eq!(
            repo_dir_name("https://github.com/startreedata/thirdeye.git"),
            "thirdeye"
        );
    }

    #[test]
    fn repo_dir_name_handles_bare_urls() {
        assert_eq!(repo_dir_name("https://example.com/some/repo"), "repo");
        assert_eq!(repo_dir_name("https://example.com/some/repo/"), "repo");
    }

    #[test]
    fn clone_failure_is_reported() {
        let git = CommandSpec::new("git", &["clone"]);
        let err = clone_backend(&git, "file:///nonexistent/repo.git").unwrap_err();
        assert!(matches!(err, HarnessError::Clone { .. }));
    }
}
