use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tbcov::line_info::LineCountTable;
use tbcov::output::{build_lcov_report, read_lcov_summary, validate_path, write_lcov, FileSummary};
use tbcov::utils::diagnostics::CollectingSink;
use tbcov::utils::error::OutputError;

fn source_file(dir: &Path, name: &str) -> (String, String) {
    let path = dir.join(name);
    fs::write(&path, "int main(void) { return 0; }\n").unwrap();
    let canonical = fs::canonicalize(&path).unwrap();
    (
        path.to_string_lossy().into_owned(),
        canonical.to_string_lossy().into_owned(),
    )
}

fn lines(pairs: &[(u32, u64)]) -> BTreeMap<u32, u64> {
    pairs.iter().copied().collect()
}

#[test]
fn test_write_lcov_format() {
    let dir = tempfile::tempdir().unwrap();
    let (a_raw, a_abs) = source_file(dir.path(), "a.c");
    let (b_raw, b_abs) = source_file(dir.path(), "b.c");

    let mut table = LineCountTable::new();
    table.insert(b_raw, lines(&[(10, 0)]));
    table.insert(a_raw, lines(&[(7, 4), (3, 1), (5, 0)]));

    let out = dir.path().join("coverage.info");
    let mut sink = CollectingSink::new();
    write_lcov(&table, &out, &mut sink).unwrap();

    let expected = format!(
        "TN:\n\
         SF:{a_abs}\nDA:3,1\nDA:5,0\nDA:7,4\nLH:2\nLF:3\nend_of_record\n\
         SF:{b_abs}\nDA:10,0\nLH:0\nLF:1\nend_of_record\n"
    );
    assert_eq!(fs::read_to_string(&out).unwrap(), expected);
    assert!(sink.is_empty());
}

#[test]
fn test_missing_source_file_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let (kept_raw, kept_abs) = source_file(dir.path(), "kept.c");
    let gone = dir.path().join("gone.c");

    let mut table = LineCountTable::new();
    table.insert(gone.to_string_lossy().into_owned(), lines(&[(1, 5), (2, 0)]));
    table.insert(kept_raw, lines(&[(1, 1)]));

    let out = dir.path().join("coverage.info");
    let mut sink = CollectingSink::new();
    let report = write_lcov(&table, &out, &mut sink).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        format!("TN:\nSF:{kept_abs}\nDA:1,1\nLH:1\nLF:1\nend_of_record\n")
    );
    assert!(!text.contains("gone.c"));
    assert_eq!(report.records.len(), 1);
    assert_eq!(sink.missing_files(), vec![&gone]);
}

#[test]
fn test_foreign_paths_emitted_verbatim() {
    let mut table = LineCountTable::new();
    table.insert(r"C:\build\src\driver.c".to_string(), lines(&[(12, 0), (13, 2)]));

    let mut sink = CollectingSink::new();
    let report = build_lcov_report(&table, &mut sink);

    assert_eq!(
        report.to_lcov_string(),
        "TN:\nSF:C:\\build\\src\\driver.c\nDA:12,0\nDA:13,2\nLH:1\nLF:2\nend_of_record\n"
    );
    assert!(sink.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinked_source_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let (_, real_abs) = source_file(dir.path(), "real.c");
    let link = dir.path().join("link.c");
    std::os::unix::fs::symlink(dir.path().join("real.c"), &link).unwrap();

    let mut table = LineCountTable::new();
    table.insert(link.to_string_lossy().into_owned(), lines(&[(1, 1)]));

    let mut sink = CollectingSink::new();
    let report = build_lcov_report(&table, &mut sink);
    assert_eq!(report.records[0].source_file, real_abs);
}

#[test]
fn test_lines_hit_and_found_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let (raw, _) = source_file(dir.path(), "loop.c");

    let pairs: Vec<(u32, u64)> = (1..=20).map(|l| (l, if l % 3 == 0 { 0 } else { l as u64 })).collect();
    let mut table = LineCountTable::new();
    table.insert(raw, lines(&pairs));

    let mut sink = CollectingSink::new();
    let report = build_lcov_report(&table, &mut sink);
    let text = report.to_lcov_string();

    // 20 lines, multiples of 3 (6 of them) never executed
    assert!(text.contains("LH:14\n"));
    assert!(text.contains("LF:20\n"));
    assert_eq!(report.totals().lines_hit, 14);
    assert_eq!(report.totals().lines_found, 20);
}

#[test]
fn test_serialization_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = LineCountTable::new();
    for name in ["z.c", "m.c", "a.c"] {
        let (raw, _) = source_file(dir.path(), name);
        table.insert(raw, lines(&[(2, 1), (1, 0), (3, 9)]));
    }

    let first = dir.path().join("first.info");
    let second = dir.path().join("second.info");
    let mut sink = CollectingSink::new();
    write_lcov(&table, &first, &mut sink).unwrap();
    write_lcov(&table, &second, &mut sink).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_write_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("s2e-last/nested/coverage.info");

    let mut sink = CollectingSink::new();
    write_lcov(&LineCountTable::new(), &nested, &mut sink).unwrap();

    assert_eq!(fs::read_to_string(&nested).unwrap(), "TN:\n");
}

#[test]
fn test_write_to_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = CollectingSink::new();

    let err = write_lcov(&LineCountTable::new(), dir.path(), &mut sink).unwrap_err();
    assert!(matches!(err, OutputError::InvalidPath(_)));
}

#[cfg(unix)]
#[test]
fn test_unwritable_destination_fails() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a parent directory is expected
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let mut sink = CollectingSink::new();
    let result = write_lcov(&LineCountTable::new(), blocker.join("coverage.info"), &mut sink);
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_empty() {
    assert!(validate_path(Path::new("")).is_err());
}

#[test]
fn test_read_lcov_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coverage.info");
    fs::write(
        &path,
        "TN:\nSF:/src/a.c\nFN:1,main\nDA:1,3\nDA:2,0\nDA:4,1,abcd\nLH:2\nLF:3\nend_of_record\n\
         SF:/src/b.c\nDA:9,0\nLH:0\nLF:1\nend_of_record\n",
    )
    .unwrap();

    let summaries = read_lcov_summary(&path).unwrap();
    assert_eq!(
        summaries,
        vec![
            FileSummary {
                source_file: "/src/a.c".to_string(),
                lines_found: 3,
                lines_hit: 2,
            },
            FileSummary {
                source_file: "/src/b.c".to_string(),
                lines_found: 1,
                lines_hit: 0,
            },
        ]
    );
}

#[test]
fn test_read_lcov_summary_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coverage.info");
    fs::write(&path, "TN:\nSF:/src/a.c\nDA:x,1\nend_of_record\n").unwrap();

    match read_lcov_summary(&path).unwrap_err() {
        OutputError::MalformedReport { line, content } => {
            assert_eq!(line, 3);
            assert_eq!(content, "DA:x,1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_read_lcov_summary_missing_file() {
    let result = read_lcov_summary(PathBuf::from("/no/such/coverage.info"));
    match result.unwrap_err() {
        err @ OutputError::ReadFailed { .. } => {
            assert!(err.to_string().starts_with("Failed to read file /no/such/coverage.info"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
