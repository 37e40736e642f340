//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while discovering or parsing trace files
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace data: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while mapping addresses to source lines
#[derive(Error, Debug)]
pub enum LineMapError {
    #[error("Failed to read binary {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse binary: {0}")]
    ObjectError(#[from] object::Error),

    #[error("Failed to read debug information: {0}")]
    DwarfError(#[from] addr2line::gimli::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Malformed coverage report line {line}: {content}")]
    MalformedReport { line: usize, content: String },
}

/// Errors from the external HTML renderer
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Errors loading the project descriptor
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read project descriptor {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid project descriptor: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("No analysis target configured: {0}")]
    MissingTarget(String),
}

/// Pipeline-level coverage failures
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("No translation block information found in {}", run_dir.display())]
    NoCoverageData { run_dir: PathBuf },
}
