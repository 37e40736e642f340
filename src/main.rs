//! tbcov CLI
//!
//! Generates LCOV line coverage (and optionally an HTML report) from the
//! translation block traces of an analysis project.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use env_logger::Env;
use std::path::PathBuf;

use tbcov::commands::{
    display_report_summary, display_version, execute_lcov, validate_args, LcovArgs,
};
use tbcov::utils::config::DEFAULT_RENDERER;

/// tbcov - line coverage from translation block traces
#[derive(Parser, Debug)]
#[command(name = "tbcov")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a line coverage report for a project
    Lcov {
        /// Project directory (contains project.json and s2e-last/)
        #[arg(short, long, env = "TBCOV_PROJECT", default_value = ".")]
        project: PathBuf,

        /// Binary with debug information (defaults to project.json's target_path)
        #[arg(long)]
        target_path: Option<PathBuf>,

        /// Module name used in trace files (defaults to project.json's target)
        #[arg(long)]
        target: Option<String>,

        /// Also generate an HTML report
        #[arg(long)]
        html: bool,

        /// HTML renderer executable
        #[arg(long, default_value = DEFAULT_RENDERER)]
        genhtml: String,
    },

    /// Summarize an existing coverage.info file
    Summary {
        /// Path to the LCOV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Lcov {
            project,
            target_path,
            target,
            html,
            genhtml,
        } => {
            let args = LcovArgs {
                project_dir: project,
                target_path,
                target_name: target,
                html,
                renderer: genhtml,
            };

            // Validate args first
            validate_args(&args)?;

            let message = execute_lcov(args)?;
            println!("{} {}", "✓".green(), message);
        }

        Commands::Summary { file } => {
            display_report_summary(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
