//! Configuration and constants for the CLI.

use super::error::ConfigError;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory (relative to the project) holding the latest analysis run
pub const RUN_DIR_NAME: &str = "s2e-last";

/// Line coverage report written inside the run directory
pub const COVERAGE_INFO_FILE: &str = "coverage.info";

/// HTML report directory inside the run directory
pub const HTML_DIR_NAME: &str = "lcov";

// Translation block trace files look like "tbcoverage-<n>.json"
pub const TB_FILE_PREFIX: &str = "tbcoverage-";
pub const TB_FILE_EXTENSION: &str = "json";

/// Project descriptor written when the project was created
pub const PROJECT_DESCRIPTOR_FILE: &str = "project.json";

/// External executable used to turn an LCOV report into HTML
pub const DEFAULT_RENDERER: &str = "genhtml";

/// The subset of `project.json` needed for coverage generation
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDescriptor {
    /// Path of the analysed binary (carries the debug information)
    pub target_path: PathBuf,

    /// Module name used as the key inside trace files
    #[serde(default)]
    pub target: Option<String>,
}

impl ProjectDescriptor {
    /// Module name, falling back to the file name of `target_path`
    pub fn target_name(&self) -> Option<String> {
        self.target.clone().filter(|t| !t.is_empty()).or_else(|| {
            self.target_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
    }
}

/// Load `project.json` from a project directory
pub fn load_project_descriptor(project_dir: &Path) -> Result<ProjectDescriptor, ConfigError> {
    let path = project_dir.join(PROJECT_DESCRIPTOR_FILE);
    debug!("Loading project descriptor: {}", path.display());

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
        path: path.clone(),
        source,
    })?;

    Ok(serde_json::from_str(&raw)?)
}
