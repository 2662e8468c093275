//! Locating the UI project directory
//!
//! The harness is normally run from somewhere inside the UI repo's e2e
//! tree, so the UI project is found by walking up the parent chain and
//! looking for a sibling directory with the well-known name.

use std::path::{Path, PathBuf};

/// Walk up from `start` at most `max_levels` parents looking for a child
/// directory called `name`.
///
/// Returns the first hit; if no level matches, returns the candidate at
/// the last visited level without checking that it exists.
pub fn locate_ui_dir(start: &Path, name: &str, max_levels: usize) -> PathBuf {
    let mut path = start.to_path_buf();

    for _ in 0..max_levels {
        let Some(parent) = path.parent() else { break };
        path = parent.to_path_buf();

        if path.join(name).is_dir() {
            break;
        }
    }

    path.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_sibling_one_level_up() {
        let root = tempfile::tempdir().unwrap();
        let ui = root.path().join("thirdeye-ui");
        let cwd = root.path().join("helper-scripts");
        fs::create_dir_all(&ui).unwrap();
        fs::create_dir_all(&cwd).unwrap();

        assert_eq!(locate_ui_dir(&cwd, "thirdeye-ui", 5), ui);
    }

    #[test]
    fn finds_sibling_several_levels_up() {
        let root = tempfile::tempdir().unwrap();
        let ui = root.path().join("thirdeye-ui");
        let cwd = root.path().join("a/b/c/d");
        fs::create_dir_all(&ui).unwrap();
        fs::create_dir_all(&cwd).unwrap();

        assert_eq!(locate_ui_dir(&cwd, "thirdeye-ui", 5), ui);
    }

    #[test]
    fn beyond_max_levels_returns_a_guess_without_error() {
        let root = tempfile::tempdir().unwrap();
        let ui = root.path().join("thirdeye-ui");
        let cwd = root.path().join("a/b/c/d/e/f/g");
        fs::create_dir_all(&ui).unwrap();
        fs::create_dir_all(&cwd).unwrap();

        let found = locate_ui_dir(&cwd, "thirdeye-ui", 5);
        // Five levels up from g is b; the guess points at a path that
        // does not exist and is returned as-is.
        assert_eq!(found, root.path().join("a/b/thirdeye-ui"));
        assert!(!found.exists());
    }

    #[test]
    fn stops_at_filesystem_root() {
        let found = locate_ui_dir(Path::new("/"), "no-such-dir-name", 5);
        assert_eq!(found, PathBuf::from("/no-such-dir-name"));
    }
}
