use crate::output::CoverageTotals;
use crate::utils::config::{DEFAULT_RENDERER, RUN_DIR_NAME};
use std::path::PathBuf;

/// Arguments for the lcov command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct LcovArgs {
    /// Project directory containing the run directory and project.json
    pub project_dir: PathBuf,

    /// Binary with debug information (None = read from project.json)
    pub target_path: Option<PathBuf>,

    /// Module name used inside trace files (None = project.json / file name)
    pub target_name: Option<String>,

    /// Also render an HTML report
    pub html: bool,

    /// HTML renderer executable
    pub renderer: String,
}

impl Default for LcovArgs {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            target_path: None,
            target_name: None,
            html: false,
            renderer: DEFAULT_RENDERER.to_string(),
        }
    }
}

impl LcovArgs {
    /// Directory of the latest run: `<project>/s2e-last`
    pub fn run_dir(&self) -> PathBuf {
        self.project_dir.join(RUN_DIR_NAME)
    }
}

/// Binary and module name the coverage is computed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub name: String,
}

/// What a successful lcov run produced
#[derive(Debug, Clone)]
pub struct LcovOutcome {
    /// Written LCOV file
    pub report_path: PathBuf,

    /// HTML directory, when rendering was requested
    pub html_dir: Option<PathBuf>,

    /// Figures over the written report
    pub totals: CoverageTotals,
}

impl LcovOutcome {
    /// Message shown to the operator
    pub fn message(&self) -> String {
        match &self.html_dir {
            Some(dir) => format!(
                "Line coverage saved to {}. An HTML report is available in {}",
                self.report_path.display(),
                dir.display()
            ),
            None => format!("Line coverage saved to {}", self.report_path.display()),
        }
    }
}
