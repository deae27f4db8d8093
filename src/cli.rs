//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ChipCheck - build-quality gate for embedded firmware
///
/// Aggregates clang-tidy/cppcheck output into a categorized lint
/// report and keeps Unity test files' entry points in sync with the
/// test functions they declare.
///
/// Examples:
///   chipcheck lint
///   chipcheck lint --script ./lint_files.sh --format json
///   chipcheck sync-tests
///   chipcheck sync-tests --check
///   chipcheck init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .chipcheck.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// The gate's two pipelines plus config bootstrap.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the analysis launcher and build a categorized lint report
    Lint(LintArgs),
    /// Regenerate test entry points and verify run-script inclusion
    SyncTests(SyncArgs),
    /// Generate a default .chipcheck.toml configuration file
    InitConfig,
}

/// Options for the lint report pipeline.
#[derive(clap::Args, Debug, Clone)]
pub struct LintArgs {
    /// Path to the analysis launcher script
    ///
    /// Can also be set via CHIPCHECK_LINT_SCRIPT or .chipcheck.toml.
    #[arg(short, long, value_name = "FILE", env = "CHIPCHECK_LINT_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Retain note: diagnostic lines in the uncategorized section
    #[arg(long, conflicts_with = "no_notes")]
    pub notes: bool,

    /// Drop note: diagnostic lines from the uncategorized section
    #[arg(long, conflicts_with = "notes")]
    pub no_notes: bool,

    /// Launcher timeout in seconds
    ///
    /// No timeout is imposed unless set here or in the config file.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Options for the test harness synchronizer.
#[derive(clap::Args, Debug, Clone)]
pub struct SyncArgs {
    /// Directory containing test source files
    #[arg(long, value_name = "DIR")]
    pub tests_dir: Option<PathBuf>,

    /// Path to the test execution script
    #[arg(long, value_name = "FILE")]
    pub run_script: Option<PathBuf>,

    /// Report files that would change without rewriting them
    #[arg(long)]
    pub check: bool,
}

/// Output format for the lint report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Lint(lint) => {
                if let Some(0) = lint.timeout {
                    return Err("Timeout must be at least 1 second".to_string());
                }
                if let Some(ref output) = lint.output {
                    if output.as_os_str().is_empty() {
                        return Err("Output path must not be empty".to_string());
                    }
                }
            }
            Command::SyncTests(sync) => {
                if let Some(ref dir) = sync.tests_dir {
                    if dir.as_os_str().is_empty() {
                        return Err("Tests directory must not be empty".to_string());
                    }
                }
            }
            Command::InitConfig => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
