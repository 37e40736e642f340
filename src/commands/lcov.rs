//! Lcov command implementation.
//!
//! The lcov command:
//! 1. Finds translation block files of the last run
//! 2. Parses the target's ranges from each file
//! 3. Aggregates them into per-address counts
//! 4. Maps addresses to source lines
//! 5. Writes the LCOV report
//! 6. Renders HTML (optional)

use super::models::{LcovArgs, LcovOutcome, ResolvedTarget};
use crate::aggregator::{calculate_address_stats, AddressCountTable};
use crate::line_info::{DwarfLineMapper, LineMapper};
use crate::output::{render_html, write_lcov};
use crate::parser::{find_tb_files, read_tb_file};
use crate::utils::config::{load_project_descriptor, COVERAGE_INFO_FILE, HTML_DIR_NAME};
use crate::utils::diagnostics::{DiagnosticSink, LogSink};
use crate::utils::error::{ConfigError, CoverageError};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the lcov command
///
/// **Public** - main entry point called from main.rs
///
/// Runs the pipeline with the DWARF line mapper and logs diagnostics as
/// warnings.
///
/// # Returns
/// Message describing where the report (and HTML) were written
pub fn execute_lcov(args: LcovArgs) -> Result<String> {
    let outcome = run_lcov(&args, &DwarfLineMapper::new(), &mut LogSink)?;
    Ok(outcome.message())
}

/// Run the coverage pipeline with injected collaborators
///
/// **Public** - lets tests swap the line mapper and observe diagnostics
///
/// # Errors
/// * `CoverageError::NoCoverageData` - no trace file yielded any address;
///   nothing is written in that case
/// * Line mapping, report write and renderer failures, with context
pub fn run_lcov(
    args: &LcovArgs,
    mapper: &dyn LineMapper,
    sink: &mut dyn DiagnosticSink,
) -> Result<LcovOutcome> {
    let start_time = Instant::now();
    let target = resolve_target(args)?;
    let run_dir = args.run_dir();
    let steps = total_steps(args);

    info!("Generating line coverage for {} ({})", target.name, target.path.display());

    // Step 1: Collect address coverage
    info!("Step 1/{}: Collecting translation block coverage...", steps);
    let addr_counts = collect_address_counts(args, &target.name, sink)?;

    if addr_counts.is_empty() {
        return Err(CoverageError::NoCoverageData { run_dir }.into());
    }

    info!("Address coverage: {}", calculate_address_stats(&addr_counts).summary());

    // Step 2: Map to source lines
    info!("Step 2/{}: Mapping addresses to source lines...", steps);
    let line_counts = mapper
        .resolve(&addr_counts, &target.path)
        .with_context(|| format!("Failed to read line information from {}", target.path.display()))?;

    debug!("Line information for {} source files", line_counts.len());

    // Step 3: Write outputs
    info!("Step 3/{}: Writing line coverage report...", steps);
    let report_path = run_dir.join(COVERAGE_INFO_FILE);
    let report = write_lcov(&line_counts, &report_path, sink)
        .context("Failed to write line coverage report")?;

    // Step 4: Render HTML
    let html_dir = if args.html {
        info!("Step 4/{}: Rendering HTML report with {}...", steps, args.renderer);
        let dir = render_html(&args.renderer, &report_path, &run_dir.join(HTML_DIR_NAME))
            .context("Failed to generate HTML report")?;
        Some(dir)
    } else {
        None
    };

    info!("Coverage completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(LcovOutcome {
        report_path,
        html_dir,
        totals: report.totals(),
    })
}

/// Number of pipeline steps; HTML rendering adds one
fn total_steps(args: &LcovArgs) -> usize {
    if args.html {
        4
    } else {
        3
    }
}

/// Aggregate every trace file of the run, one file at a time
fn collect_address_counts(
    args: &LcovArgs,
    target_name: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<AddressCountTable> {
    let tb_files = find_tb_files(&args.run_dir()).context("Failed to list translation block files")?;

    let mut addr_counts = AddressCountTable::new();
    for tb_file in &tb_files {
        if let Some(ranges) = read_tb_file(tb_file, target_name, sink) {
            addr_counts.add_ranges(ranges, sink);
        }
    }

    debug!(
        "{} trace files, {} ranges, {} addresses",
        tb_files.len(),
        addr_counts.ranges_observed(),
        addr_counts.len()
    );

    Ok(addr_counts)
}

/// Work out which binary and module name to use
///
/// **Public** - command-line values win over `project.json`
pub fn resolve_target(args: &LcovArgs) -> Result<ResolvedTarget> {
    if let (Some(path), Some(name)) = (&args.target_path, &args.target_name) {
        return Ok(ResolvedTarget {
            path: path.clone(),
            name: name.clone(),
        });
    }

    let (path, descriptor) = match &args.target_path {
        Some(path) => (path.clone(), None),
        None => {
            let descriptor = load_project_descriptor(&args.project_dir)
                .context("Failed to load project descriptor")?;
            (descriptor.target_path.clone(), Some(descriptor))
        }
    };

    let name = args
        .target_name
        .clone()
        .or_else(|| descriptor.as_ref().and_then(|d| d.target_name()))
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .ok_or_else(|| ConfigError::MissingTarget(path.display().to_string()))?;

    Ok(ResolvedTarget { path, name })
}

/// Validate lcov arguments
///
/// **Public** - can be called before execute_lcov for early validation
pub fn validate_args(args: &LcovArgs) -> Result<()> {
    if !args.project_dir.is_dir() {
        anyhow::bail!("Project directory {} does not exist", args.project_dir.display());
    }

    if args.renderer.trim().is_empty() {
        anyhow::bail!("HTML renderer cannot be empty");
    }

    if args.target_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        anyhow::bail!("Target name cannot be empty");
    }

    Ok(())
}
