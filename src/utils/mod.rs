//! Utility modules for configuration, error handling, and diagnostics.

pub mod config;
pub mod diagnostics;
pub mod error;

// Re-export commonly used types for convenience
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink};
pub use error::{ConfigError, CoverageError, LineMapError, OutputError, RenderError, TraceError};
