//! Cleanup of service processes left behind by previous runs
//!
//! Backend, frontend and Pinot children from an aborted run keep their
//! ports, so a fresh run scans the process table for known command-line
//! substrings and kills the matches before bringing anything up.

use std::process::Command;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, info};

use crate::config::CommandSpec;
use crate::error::{HarnessError, HarnessResult};

/// Kill every lingering process matching one of the keywords.
///
/// A missing match is not an error; a failed kill is fatal.
pub fn cleanup_lingering_processes(ps: &CommandSpec, keywords: &[String]) -> HarnessResult<()> {
    for keyword in keywords {
        let output = Command::new(&ps.program).args(&ps.args).output()?;

        if !output.status.success() {
            return Err(HarnessError::Cleanup(format!(
                "{} exited with {}",
                ps.program, output.status
            )));
        }

        let listing = String::from_utf8_lossy(&output.stdout);

        match first_matching_pid(&listing, keyword) {
            Some(pid) => {
                info!("Killing lingering process {} (matched '{}')", pid, keyword);
                kill(Pid::from_raw(pid), Signal::SIGKILL).map_err(|e| {
                    HarnessError::Cleanup(format!("failed to kill pid {}: {}", pid, e))
                })?;
            }
            None => debug!("No lingering process matching '{}'", keyword),
        }
    }

    Ok(())
}

/// Extract the pid of the first process-table line containing `keyword`.
///
/// Lines produced by a `grep <keyword>` run (including our own scan when
/// the listing is pre-filtered through grep) and blank lines are skipped.
/// Expects `ps aux` column order, pid in the second column.
pub fn first_matching_pid(listing: &str, keyword: &str) -> Option<i32> {
    let self_entry = format!("grep {}", keyword);

    for line in listing.lines() {
        if line.is_empty() || line.contains(&self_entry) || !line.contains(keyword) {
            continue;
        }

        if let Some(pid) = line.split_whitespace().nth(1) {
            if let Ok(pid) = pid.parse::<i32>() {
                return Some(pid);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
USER         PID %CPU %MEM    VSZ   RSS TTY      STAT START   TIME COMMAND
dev         4242  1.2  3.4 999999 88888 ?       Sl   10:00   0:42 java -jar thirdeye/thirdeye-distribution/app.jar
dev         5555  0.0  0.0   6432  2284 pts/0   S+   10:01   0:00 grep thirdeye/thirdeye-distribution

dev         7777  2.0  1.0 555555 44444 ?       Sl   10:02   0:10 node webpack serve --port 7004
";

    #[test]
    fn picks_first_matching_pid() {
        assert_eq!(
            first_matching_pid(LISTING, "thirdeye/thirdeye-distribution"),
            Some(4242)
        );
    }

    #[test]
    fn skips_grep_self_entry() {
        // Only the grep line mentions the keyword once pid 4242 is gone
        let listing = LISTING.replace("thirdeye/thirdeye-distribution/app.jar", "app.jar");
        assert_eq!(first_matching_pid(&listing, "thirdeye/thirdeye-distribution"), None);
    }

    #[test]
    fn no_match_yields_none() {
        assert_eq!(first_matching_pid(LISTING, "pinot/pinot-distribution"), None);
    }

    #[test]
    fn matches_other_keywords_independently() {
        assert_eq!(first_matching_pid(LISTING, "webpack"), Some(7777));
    }

    #[test]
    fn empty_listing_yields_none() {
        assert_eq!(first_matching_pid("", "webpack"), None);
    }
}
