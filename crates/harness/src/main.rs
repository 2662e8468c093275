//! Entry point for the `te-e2e` binary

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use te_e2e_harness::{CypressMode, Harness, HarnessConfig, HarnessError};

#[derive(Parser, Debug)]
#[command(name = "te-e2e")]
#[command(about = "Local end-to-end test environment for ThirdEye")]
struct Args {
    /// Use cypress run instead of open
    #[arg(short = 'r', long)]
    run_only: bool,

    /// Compose file describing the Pinot stack
    #[arg(long, default_value = "docker-compose.yaml")]
    compose_file: PathBuf,

    /// UI project directory (skips the upward search)
    #[arg(long)]
    ui_dir: Option<PathBuf>,

    /// Leave processes from previous runs alone
    #[arg(long)]
    skip_lingering_cleanup: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    std::process::exit(match run(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<HarnessError>() {
                Some(HarnessError::CypressFailed(_)) => 1,
                _ => 2,
            }
        }
    });
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = HarnessConfig {
        compose_file: args.compose_file,
        ui_dir_override: args.ui_dir,
        ..Default::default()
    };

    let mode = CypressMode::from_run_only(args.run_only);
    let mut harness = Harness::new(config);

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(harness.run(mode, args.skip_lingering_cleanup))?;
    Ok(())
}
