//! Local end-to-end environment harness for ThirdEye
//!
//! Brings up Pinot through `docker compose`, clones a fresh backend
//! checkout, starts the backend and the local UI, runs Cypress against
//! them and tears everything down afterwards:
//!
//! ```text
//! cleanup ── adapt compose ── compose up ── wait pinot
//!     └─ clone backend ── launch backend + frontend ── wait ready
//!         └─ cypress open|run
//! teardown (always): compose down, stop children, cleanup, revert
//! ```

pub mod checkout;
pub mod compose;
pub mod config;
pub mod cypress;
pub mod error;
pub mod harness;
pub mod launch;
pub mod paths;
pub mod process;
pub mod readiness;

pub use config::HarnessConfig;
pub use cypress::CypressMode;
pub use error::{HarnessError, HarnessResult};
pub use harness::Harness;
