//! Output writers for coverage reports.
//!
//! This module handles:
//! - LCOV text reports (`coverage.info`)
//! - HTML reports via an external renderer

pub mod html;
pub mod lcov;

// Re-export main functions
pub use html::render_html;
pub use lcov::{
    build_lcov_report, normalize_source_path, read_lcov_summary, write_lcov, CoverageTotals,
    FileSummary, LcovRecord, LcovReport,
};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
