use crate::output::{read_lcov_summary, CoverageTotals};
use anyhow::Result;
use std::path::PathBuf;

/// Print per-file figures of an existing LCOV report
pub fn display_report_summary(file_path: PathBuf) -> Result<()> {
    println!("Coverage report: {}", file_path.display());

    let summaries = read_lcov_summary(&file_path)?;

    for summary in &summaries {
        println!(
            "  {:>5}/{:<5} {}",
            summary.lines_hit, summary.lines_found, summary.source_file
        );
    }

    println!();
    println!("  {}", CoverageTotals::from_summaries(&summaries).summary());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("tbcov v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Line coverage reports from translation block traces.");
}
