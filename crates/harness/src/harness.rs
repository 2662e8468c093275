//! Orchestration of the full environment run
//!
//! Sequence: cleanup, platform adapt, compose up, wait for Pinot, clone
//! backend, launch backend and frontend, wait for both, run Cypress.
//! Teardown (compose down, child termination, cleanup, adapter revert)
//! runs no matter which step failed, and the original error wins.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::checkout::clone_backend;
use crate::compose::{ComposeStack, PlatformAdapter};
use crate::config::HarnessConfig;
use crate::cypress::{CypressMode, CypressRunner};
use crate::error::{HarnessError, HarnessResult};
use crate::launch::{CommandLauncher, ServiceHandle, ServiceLauncher};
use crate::paths::locate_ui_dir;
use crate::process::cleanup_lingering_processes;
use crate::readiness::wait_for_http;

pub struct Harness {
    config: HarnessConfig,
    backend: Box<dyn ServiceLauncher>,
    frontend: Box<dyn ServiceLauncher>,
    adapter: PlatformAdapter,
    stack: ComposeStack,
    handles: Vec<ServiceHandle>,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let backend = Box::new(CommandLauncher::new(
            "backend",
            config.backend_command.clone(),
        ));
        let frontend = Box::new(CommandLauncher::new(
            "frontend",
            config.frontend_command.clone(),
        ));
        Self::with_launchers(config, backend, frontend)
    }

    /// Inject launcher implementations; used by tests to stub the services.
    pub fn with_launchers(
        config: HarnessConfig,
        backend: Box<dyn ServiceLauncher>,
        frontend: Box<dyn ServiceLauncher>,
    ) -> Self {
        let adapter = PlatformAdapter::new(
            &config.compose_file,
            &config.pinot_image,
            &config.pinot_image_arm64,
        );
        let stack = ComposeStack::new(
            &config.compose_file,
            config.compose_up.clone(),
            config.compose_down.clone(),
        );

        Self {
            config,
            backend,
            frontend,
            adapter,
            stack,
            handles: Vec::new(),
        }
    }

    /// Run the whole environment sequence with guaranteed teardown.
    pub async fn run(&mut self, mode: CypressMode, skip_lingering_cleanup: bool) -> HarnessResult<()> {
        if !skip_lingering_cleanup {
            cleanup_lingering_processes(&self.config.ps_command, &self.config.cleanup_keywords)?;
        }

        let ui_dir = self.resolve_ui_dir()?;
        info!("UI directory: {}", ui_dir.display());

        let outcome = self.bring_up_and_test(mode, &ui_dir).await;
        let teardown = self.teardown();

        match outcome {
            Err(e) => {
                error!("Run failed: {}", e);
                Err(e)
            }
            // A clean run still fails if compose down left the stack up
            Ok(()) => teardown,
        }
    }

    async fn bring_up_and_test(&mut self, mode: CypressMode, ui_dir: &Path) -> HarnessResult<()> {
        self.adapter.apply(false)?;

        self.stack.up()?;
        wait_for_http(
            &self.config.pinot_health_url,
            self.config.pinot_ready_timeout,
            self.config.ready_poll_interval,
        )
        .await?;

        let checkout = clone_backend(&self.config.git_clone, &self.config.backend_repo_url)?;

        let backend = self.backend.launch(checkout.path())?;
        self.handles.push(backend);

        let frontend = self.frontend.launch(ui_dir)?;
        self.handles.push(frontend);

        wait_for_http(
            &self.config.backend_health_url,
            self.config.services_ready_timeout,
            self.config.ready_poll_interval,
        )
        .await?;
        wait_for_http(
            &self.config.frontend_url,
            self.config.services_ready_timeout,
            self.config.ready_poll_interval,
        )
        .await?;

        let runner = CypressRunner::new(self.config.cypress.clone(), ui_dir);
        runner.check_installed()?;
        runner.run(mode)
    }

    /// Teardown always runs. Step failures are logged and only the
    /// compose-down result is reported back to the caller.
    fn teardown(&mut self) -> HarnessResult<()> {
        info!("Tearing the environment down");

        let down = self.stack.down();
        if let Err(e) = &down {
            warn!("compose down failed: {}", e);
        }

        for handle in &mut self.handles {
            handle.stop();
        }
        self.handles.clear();

        if let Err(e) =
            cleanup_lingering_processes(&self.config.ps_command, &self.config.cleanup_keywords)
        {
            warn!("Post-run process cleanup failed: {}", e);
        }

        if let Err(e) = self.adapter.apply(true) {
            warn!("Failed to revert the compose file: {}", e);
        }

        down
    }

    fn resolve_ui_dir(&self) -> HarnessResult<PathBuf> {
        if let Some(dir) = &self.config.ui_dir_override {
            if !dir.is_dir() {
                return Err(HarnessError::UiDirMissing(dir.clone()));
            }
            return Ok(dir.clone());
        }

        let cwd = std::env::current_dir()?;
        Ok(locate_ui_dir(&cwd, &self.config.ui_dir_name, 5))
    }
}
