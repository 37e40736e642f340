//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod lcov;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use lcov::{execute_lcov, resolve_target, run_lcov, validate_args};
pub use models::{LcovArgs, LcovOutcome, ResolvedTarget};
pub use utils::{display_report_summary, display_version};
