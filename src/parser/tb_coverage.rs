//! Translation block coverage file parser.
//!
//! The analysis engine writes one `tbcoverage-<n>.json` per execution node.
//! Each file is a JSON object keyed by module name; the value is a list of
//! translation blocks, each `[start_pc, end_pc, size]`:
//!
//! ```json
//! { "cgc_service": [[4198400, 4198420, 20], ["0x401020", "0x40102c", 12]] }
//! ```
//!
//! Every listed block is one observation, so it becomes an
//! [`AddressRange`] with a hit count of 1. The size column is redundant with
//! the addresses and is not used.

use crate::aggregator::AddressRange;
use crate::utils::config::{TB_FILE_EXTENSION, TB_FILE_PREFIX};
use crate::utils::diagnostics::{Diagnostic, DiagnosticSink};
use crate::utils::error::TraceError;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Find all translation block files of a run
///
/// **Public** - used by the lcov command
///
/// Looks in `run_dir` itself and in its immediate subdirectories (one per
/// execution node). A run directory that does not exist yields no files.
///
/// # Returns
/// Matching file paths, sorted
pub fn find_tb_files(run_dir: &Path) -> Result<Vec<PathBuf>, TraceError> {
    let mut files = Vec::new();

    if !run_dir.is_dir() {
        debug!("Run directory {} does not exist", run_dir.display());
        return Ok(files);
    }

    for entry in std::fs::read_dir(run_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            for nested in std::fs::read_dir(&path)? {
                let nested = nested?.path();
                if is_tb_file(&nested) {
                    files.push(nested);
                }
            }
        } else if is_tb_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    debug!("Found {} translation block files", files.len());

    Ok(files)
}

fn is_tb_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TB_FILE_PREFIX));
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == TB_FILE_EXTENSION);

    name_ok && ext_ok
}

/// Read one translation block file and extract the target's ranges
///
/// **Public** - main entry point for trace file parsing
///
/// Problems with a single file never abort the run: they are reported to
/// `sink` and the file is skipped (`None`).
pub fn read_tb_file(
    path: &Path,
    target: &str,
    sink: &mut dyn DiagnosticSink,
) -> Option<Vec<AddressRange>> {
    debug!("Parsing translation block file {}", path.display());

    let value = match load_json(path) {
        Ok(value) => value,
        Err(e) => {
            sink.report(unreadable(path, &e));
            return None;
        }
    };

    if value.as_object().is_some_and(|modules| modules.is_empty()) {
        sink.report(Diagnostic::EmptyTraceFile {
            path: path.to_path_buf(),
        });
        return None;
    }

    match parse_tb_value(&value, target) {
        Ok(Some(ranges)) => {
            debug!("{}: {} translation blocks", path.display(), ranges.len());
            Some(ranges)
        }
        Ok(None) => {
            sink.report(Diagnostic::TargetNotInTraceFile {
                path: path.to_path_buf(),
                target: target.to_string(),
            });
            None
        }
        Err(e) => {
            sink.report(unreadable(path, &e));
            None
        }
    }
}

fn load_json(path: &Path) -> Result<Value, TraceError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn unreadable(path: &Path, error: &TraceError) -> Diagnostic {
    Diagnostic::UnreadableTraceFile {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// Extract the target module's ranges from a parsed trace file
///
/// # Returns
/// * `Ok(Some(ranges))` - target present (the list may be empty)
/// * `Ok(None)` - file has no modules or none named `target`
///
/// # Errors
/// * `TraceError::InvalidFormat` - top level is not an object, or a block
///   entry is malformed
pub fn parse_tb_value(value: &Value, target: &str) -> Result<Option<Vec<AddressRange>>, TraceError> {
    let modules = value
        .as_object()
        .ok_or_else(|| TraceError::InvalidFormat("expected a JSON object".to_string()))?;

    let Some(blocks) = modules.get(target) else {
        return Ok(None);
    };

    let blocks = blocks.as_array().ok_or_else(|| {
        TraceError::InvalidFormat(format!("blocks of {} are not a list", target))
    })?;

    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| parse_block(i, block))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn parse_block(index: usize, block: &Value) -> Result<AddressRange, TraceError> {
    let fields = block
        .as_array()
        .filter(|f| f.len() >= 2)
        .ok_or_else(|| {
            TraceError::InvalidFormat(format!("block {} is not a [start, end, size] list", index))
        })?;

    let start = parse_address(&fields[0])?;
    let end = parse_address(&fields[1])?;

    Ok(AddressRange::new(start, end, 1))
}

/// Parse an address given as a JSON number or a decimal / `0x` hex string
pub fn parse_address(value: &Value) -> Result<u64, TraceError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| TraceError::InvalidFormat(format!("Invalid address: {}", n))),
        Value::String(s) => parse_address_str(s),
        other => Err(TraceError::InvalidFormat(format!(
            "Invalid address: {}",
            other
        ))),
    }
}

fn parse_address_str(value: &str) -> Result<u64, TraceError> {
    // Handle hex values (0x prefix)
    if let Some(hex_str) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u64::from_str_radix(hex_str, 16)
            .map_err(|e| TraceError::InvalidFormat(format!("Invalid hex address: {}", e)))
    } else {
        value
            .parse::<u64>()
            .map_err(|e| TraceError::InvalidFormat(format!("Invalid decimal address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_address_forms() {
        assert_eq!(parse_address(&json!(4096)).unwrap(), 4096);
        assert_eq!(parse_address(&json!("0x1000")).unwrap(), 4096);
        assert_eq!(parse_address(&json!("4096")).unwrap(), 4096);
        assert!(parse_address(&json!("0xZZ")).is_err());
        assert!(parse_address(&json!(-1)).is_err());
        assert!(parse_address(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_tb_value_target_present() {
        let value = json!({
            "demo": [[4096, 4112, 16], ["0x1008", "0x1020", 24]],
            "libc.so.6": [[1, 2, 1]]
        });

        let ranges = parse_tb_value(&value, "demo").unwrap().unwrap();
        assert_eq!(
            ranges,
            vec![
                AddressRange::new(0x1000, 0x1010, 1),
                AddressRange::new(0x1008, 0x1020, 1),
            ]
        );
    }

    #[test]
    fn test_parse_tb_value_target_absent() {
        let value = json!({ "other": [[1, 2, 1]] });
        assert!(parse_tb_value(&value, "demo").unwrap().is_none());
    }

    #[test]
    fn test_parse_tb_value_malformed_block() {
        let value = json!({ "demo": [[1]] });
        assert!(matches!(
            parse_tb_value(&value, "demo"),
            Err(TraceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_tb_value_not_object() {
        assert!(parse_tb_value(&json!([1, 2, 3]), "demo").is_err());
    }
}
