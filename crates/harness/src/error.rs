//! Error types for the environment harness

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Process cleanup failed: {0}")]
    Cleanup(String),

    #[error("Compose command failed: {0}")]
    Compose(String),

    #[error("Failed to clone {url}: {reason}")]
    Clone { url: String, reason: String },

    #[error("Failed to launch {service}: {reason}")]
    Launch { service: String, reason: String },

    #[error("Timed out after {seconds}s waiting for {url}")]
    ReadinessTimeout { url: String, seconds: u64 },

    #[error("Cypress not found. Install with: npm install cypress")]
    CypressNotFound,

    #[error("Cypress exited with {0}")]
    CypressFailed(String),

    #[error("UI directory not found at {0}")]
    UiDirMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
