//! Recoverable warnings raised while building a report.
//!
//! Components never call the logger directly for these; they hand a
//! [`Diagnostic`] to whatever [`DiagnosticSink`] the caller injected.
//! The CLI uses [`LogSink`], tests use [`CollectingSink`].

use log::warn;
use std::fmt;
use std::path::PathBuf;

/// A condition worth telling the operator about that does not abort the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Source file named in the debug info is not on disk; its record is skipped
    MissingSourceFile { path: PathBuf },

    /// Range with `start > end`; contributes nothing
    InvalidRange { start: u64, end: u64 },

    /// Trace file could not be read or parsed; skipped
    UnreadableTraceFile { path: PathBuf, reason: String },

    /// Trace file holds no modules at all
    EmptyTraceFile { path: PathBuf },

    /// Trace file has no entry for the analysis target
    TargetNotInTraceFile { path: PathBuf, target: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSourceFile { path } => {
                write!(f, "Cannot find source file '{}'. Skipping...", path.display())
            }
            Self::InvalidRange { start, end } => {
                write!(f, "Ignoring inverted address range {start:#x}..{end:#x}")
            }
            Self::UnreadableTraceFile { path, reason } => write!(
                f,
                "Failed to parse translation block file {}: {}",
                path.display(),
                reason
            ),
            Self::EmptyTraceFile { path } => {
                write!(f, "Translation block file {} is empty", path.display())
            }
            Self::TargetNotInTraceFile { path, target } => write!(
                f,
                "Target {} not found in translation block file {}",
                target,
                path.display()
            ),
        }
    }
}

/// Receiver for [`Diagnostic`]s
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `log::warn!`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
    }
}

/// Keeps diagnostics in memory so they can be asserted on
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Paths reported as missing source files
    pub fn missing_files(&self) -> Vec<&PathBuf> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::MissingSourceFile { path } => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_records_in_order() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::InvalidRange { start: 8, end: 4 });
        sink.report(Diagnostic::MissingSourceFile {
            path: PathBuf::from("/nope.c"),
        });

        assert_eq!(sink.diagnostics.len(), 2);
        assert_eq!(sink.missing_files(), vec![&PathBuf::from("/nope.c")]);
    }

    #[test]
    fn test_missing_file_message() {
        let d = Diagnostic::MissingSourceFile {
            path: PathBuf::from("/src/main.c"),
        };
        assert_eq!(d.to_string(), "Cannot find source file '/src/main.c'. Skipping...");
    }

    #[test]
    fn test_invalid_range_message_is_hex() {
        let d = Diagnostic::InvalidRange {
            start: 0x2000,
            end: 0x1000,
        };
        assert_eq!(d.to_string(), "Ignoring inverted address range 0x2000..0x1000");
    }
}
