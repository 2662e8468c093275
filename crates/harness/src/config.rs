//! Harness configuration
//!
//! Everything the run depends on — image tags, URLs, external command
//! lines — lives here as explicit values rather than module globals, so
//! tests can substitute stub commands and endpoints.

use std::path::PathBuf;
use std::time::Duration;

/// A command line split into program + arguments.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Configuration for a full environment run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Compose file rewritten by the platform adapter and used for up/down.
    pub compose_file: PathBuf,

    /// Pinot image tag used on x86 hosts.
    pub pinot_image: String,

    /// Pinot image tag substituted in on ARM hosts.
    pub pinot_image_arm64: String,

    /// Upstream repository holding the backend source.
    pub backend_repo_url: String,

    /// Name of the UI project directory searched for above the cwd.
    pub ui_dir_name: String,

    /// Explicit UI directory, skipping the upward search.
    pub ui_dir_override: Option<PathBuf>,

    /// Substrings identifying processes left over from previous runs.
    pub cleanup_keywords: Vec<String>,

    /// Process listing command (`ps aux`).
    pub ps_command: CommandSpec,

    /// Compose up/down invocations, run in the compose file's directory.
    pub compose_up: CommandSpec,
    pub compose_down: CommandSpec,

    /// Clone command; the repository URL is appended as the last argument.
    pub git_clone: CommandSpec,

    /// Test runner invocation; the mode verb (`open`/`run`) is appended.
    pub cypress: CommandSpec,

    /// Backend launch command, spawned in the cloned checkout.
    pub backend_command: CommandSpec,

    /// Frontend launch command, spawned in the UI directory.
    pub frontend_command: CommandSpec,

    /// Readiness endpoints and bounds.
    pub pinot_health_url: String,
    pub backend_health_url: String,
    pub frontend_url: String,
    pub pinot_ready_timeout: Duration,
    pub services_ready_timeout: Duration,
    pub ready_poll_interval: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            compose_file: PathBuf::from("docker-compose.yaml"),
            pinot_image: "apachepinot/pinot:0.12.1".to_string(),
            pinot_image_arm64: "apachepinot/pinot:0.12.1-arm64".to_string(),
            backend_repo_url: "https://github.com/startreedata/thirdeye.git".to_string(),
            ui_dir_name: "thirdeye-ui".to_string(),
            ui_dir_override: None,
            cleanup_keywords: vec![
                "thirdeye/thirdeye-distribution".to_string(),
                "thirdeye/thirdeye-ui".to_string(),
                "webpack".to_string(),
                "pinot/pinot-distribution".to_string(),
            ],
            ps_command: CommandSpec::new("ps", &["aux"]),
            compose_up: CommandSpec::new("docker", &["compose", "up", "-d"]),
            compose_down: CommandSpec::new("docker", &["compose", "down"]),
            git_clone: CommandSpec::new("git", &["clone"]),
            cypress: CommandSpec::new("npx", &["cypress"]),
            backend_command: CommandSpec::new(
                "sh",
                &[
                    "-c",
                    "./mvnw -q -DskipTests install && \
                     ./thirdeye-distribution/target/thirdeye-distribution/bin/thirdeye.sh server",
                ],
            ),
            frontend_command: CommandSpec::new("npm", &["run", "start"]),
            pinot_health_url: "http://localhost:9000/health".to_string(),
            backend_health_url: "http://localhost:8080/api/app/info".to_string(),
            frontend_url: "http://localhost:7004".to_string(),
            pinot_ready_timeout: Duration::from_secs(120),
            services_ready_timeout: Duration::from_secs(180),
            ready_poll_interval: Duration::from_millis(500),
        }
    }
}
