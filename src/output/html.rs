//! HTML report generation through an external renderer (`genhtml`).
//!
//! Nothing is transformed here: the renderer is run once on the LCOV file,
//! its stdout goes straight to ours, and its stderr is captured so that a
//! failure can carry it while still being echoed to the operator.

use crate::utils::error::RenderError;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Render an LCOV report to HTML
///
/// **Public** - optional last step of the lcov command
///
/// # Arguments
/// * `renderer` - Executable to run, normally `genhtml`
/// * `report_path` - LCOV file (first positional argument)
/// * `output_dir` - Passed as `--output-directory`
///
/// # Returns
/// The output directory
///
/// # Errors
/// * `RenderError::Spawn` - renderer could not be started
/// * `RenderError::Failed` - renderer exited unsuccessfully
pub fn render_html(
    renderer: &str,
    report_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf, RenderError> {
    info!("Generating HTML report in {}", output_dir.display());
    debug!(
        "Running: {} {} --output-directory {}",
        renderer,
        report_path.display(),
        output_dir.display()
    );

    let output = Command::new(renderer)
        .arg(report_path)
        .arg("--output-directory")
        .arg(output_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| RenderError::Spawn {
            program: renderer.to_string(),
            source,
        })?;

    // Forwarding is best effort; a closed stderr must not mask the renderer's result
    let _ = std::io::stderr().write_all(&output.stderr);

    if !output.status.success() {
        return Err(RenderError::Failed {
            program: renderer.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output_dir.to_path_buf())
}
