//! Trace discovery and parsing.
//!
//! This module handles:
//! - Locating translation block files in a run directory
//! - Parsing them into address ranges for the analysis target
//! - Reporting unusable files as diagnostics

pub mod tb_coverage;

// Re-export main functions
pub use tb_coverage::{find_tb_files, parse_address, parse_tb_value, read_tb_file};
