//! LCOV line coverage writer.
//!
//! The format consumed by `genhtml` and most coverage dashboards:
//!
//! ```text
//! TN:
//! SF:<absolute source path>
//! DA:<line>,<execution count>
//! LH:<lines with a non-zero count>
//! LF:<instrumented lines>
//! end_of_record
//! ```
//!
//! Records are emitted in source path order and lines in ascending order,
//! so the same line table and filesystem always give the same bytes.

use super::validate_path;
use crate::line_info::LineCountTable;
use crate::utils::diagnostics::{Diagnostic, DiagnosticSink};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Coverage of one source file
///
/// **Public** - part of the in-memory report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcovRecord {
    /// Absolute (or foreign, verbatim) source path
    pub source_file: String,

    /// `(line, count)` pairs, ascending by line
    pub lines: Vec<(u32, u64)>,
}

impl LcovRecord {
    /// Number of instrumented lines (`LF`)
    pub fn lines_found(&self) -> usize {
        self.lines.len()
    }

    /// Number of lines executed at least once (`LH`)
    pub fn lines_hit(&self) -> usize {
        self.lines.iter().filter(|(_, count)| *count != 0).count()
    }
}

/// A complete line coverage report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcovReport {
    pub records: Vec<LcovRecord>,
}

/// Totals over every record of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageTotals {
    pub files: usize,
    pub lines_found: usize,
    pub lines_hit: usize,
}

impl CoverageTotals {
    /// Totals of the records of a report read back from disk
    pub fn from_summaries(summaries: &[FileSummary]) -> Self {
        summaries.iter().fold(
            Self {
                files: summaries.len(),
                ..Self::default()
            },
            |mut totals, summary| {
                totals.lines_found += summary.lines_found;
                totals.lines_hit += summary.lines_hit;
                totals
            },
        )
    }

    /// Percentage of instrumented lines that were hit
    pub fn percentage(&self) -> f64 {
        if self.lines_found == 0 {
            0.0
        } else {
            (self.lines_hit as f64 / self.lines_found as f64) * 100.0
        }
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Files: {} | Lines: {}/{} ({:.1}%)",
            self.files,
            self.lines_hit,
            self.lines_found,
            self.percentage()
        )
    }
}

impl LcovReport {
    /// Serialize to LCOV text
    pub fn to_lcov_string(&self) -> String {
        let mut output = String::from("TN:\n");

        for record in &self.records {
            let _ = writeln!(output, "SF:{}", record.source_file);
            for (line, count) in &record.lines {
                let _ = writeln!(output, "DA:{line},{count}");
            }
            let _ = writeln!(output, "LH:{}", record.lines_hit());
            let _ = writeln!(output, "LF:{}", record.lines_found());
            output.push_str("end_of_record\n");
        }

        output
    }

    pub fn totals(&self) -> CoverageTotals {
        CoverageTotals {
            files: self.records.len(),
            lines_found: self.records.iter().map(LcovRecord::lines_found).sum(),
            lines_hit: self.records.iter().map(LcovRecord::lines_hit).sum(),
        }
    }
}

/// Normalize a source path from the debug information
///
/// Paths containing a back-slash come from another operating system; they
/// are returned verbatim and never checked. Other paths are made absolute
/// with symlinks resolved.
///
/// # Returns
/// * `Ok(path)` - path to emit in the `SF:` line
/// * `Err(path)` - best-effort absolute path of a file that is not on disk
pub fn normalize_source_path(src_file: &str) -> Result<String, PathBuf> {
    if src_file.contains('\\') {
        return Ok(src_file.to_string());
    }

    match std::fs::canonicalize(src_file) {
        Ok(resolved) if resolved.is_file() => Ok(resolved.to_string_lossy().into_owned()),
        Ok(resolved) => Err(resolved),
        Err(_) => Err(std::env::current_dir()
            .map(|cwd| cwd.join(src_file))
            .unwrap_or_else(|_| PathBuf::from(src_file))),
    }
}

/// Build the in-memory report from a line table
///
/// **Public** - serialization without touching the destination file
///
/// Files that cannot be found on disk are reported to `sink` as
/// [`Diagnostic::MissingSourceFile`] and left out of the report.
pub fn build_lcov_report(line_counts: &LineCountTable, sink: &mut dyn DiagnosticSink) -> LcovReport {
    let mut records = Vec::with_capacity(line_counts.len());

    for (src_file, lines) in line_counts {
        let source_file = match normalize_source_path(src_file) {
            Ok(path) => path,
            Err(path) => {
                sink.report(Diagnostic::MissingSourceFile { path });
                continue;
            }
        };

        records.push(LcovRecord {
            source_file,
            lines: lines.iter().map(|(&line, &count)| (line, count)).collect(),
        });
    }

    // Canonical paths can sort differently from the raw keys
    records.sort_by(|a, b| a.source_file.cmp(&b.source_file));

    LcovReport { records }
}

/// Write a line table as an LCOV report
///
/// **Public** - main entry point for report output
///
/// # Arguments
/// * `line_counts` - Per-file line counts from the line mapper
/// * `output_path` - Destination, typically `<run dir>/coverage.info`
/// * `sink` - Receives missing source file diagnostics
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error creating or writing the file
pub fn write_lcov(
    line_counts: &LineCountTable,
    output_path: impl AsRef<Path>,
    sink: &mut dyn DiagnosticSink,
) -> Result<LcovReport, OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing line coverage to {}", output_path.display());

    validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let report = build_lcov_report(line_counts, sink);

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(report.to_lcov_string().as_bytes())?;
    writer.flush()?;

    info!("Coverage written: {}", report.totals().summary());

    Ok(report)
}

/// Per-file figures read back from an LCOV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub source_file: String,
    pub lines_found: usize,
    pub lines_hit: usize,
}

/// Read an LCOV report and summarize each record
///
/// **Public** - used by the summary command
///
/// Counts are recomputed from `DA` lines. Record types other than
/// `SF`/`DA`/`end_of_record` are ignored.
///
/// # Errors
/// * `OutputError::ReadFailed` - the report cannot be read
/// * `OutputError::MalformedReport` - unparseable `DA` line or `DA` outside a record
pub fn read_lcov_summary(input_path: impl AsRef<Path>) -> Result<Vec<FileSummary>, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading coverage report from: {}", input_path.display());

    let content =
        std::fs::read_to_string(input_path).map_err(|source| OutputError::ReadFailed {
            path: input_path.to_path_buf(),
            source,
        })?;

    let mut summaries = Vec::new();
    let mut current: Option<FileSummary> = None;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let malformed = || OutputError::MalformedReport {
            line: index + 1,
            content: line.to_string(),
        };

        if let Some(path) = line.strip_prefix("SF:") {
            current = Some(FileSummary {
                source_file: path.to_string(),
                lines_found: 0,
                lines_hit: 0,
            });
        } else if let Some(data) = line.strip_prefix("DA:") {
            let record = current.as_mut().ok_or_else(malformed)?;
            // DA:<line>,<count>[,<checksum>]
            let mut fields = data.split(',');
            let _line_no: u32 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(malformed)?;
            let count: u64 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(malformed)?;

            record.lines_found += 1;
            if count != 0 {
                record.lines_hit += 1;
            }
        } else if line == "end_of_record" {
            if let Some(record) = current.take() {
                summaries.push(record);
            }
        }
    }

    Ok(summaries)
}
