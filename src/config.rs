//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.chipcheck.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Lint pipeline settings.
    #[serde(default)]
    pub lint: LintConfig,

    /// Test harness settings.
    #[serde(default)]
    pub tests: TestsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Lint pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Analysis launcher invoked to produce the combined tool output.
    #[serde(default = "default_lint_script")]
    pub script: PathBuf,

    /// Report output path.
    #[serde(default = "default_lint_output")]
    pub output: PathBuf,

    /// Retain `note:` lines in the uncategorized section.
    #[serde(default = "default_include_notes")]
    pub include_notes: bool,

    /// Launcher timeout in seconds; absent means wait forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            script: default_lint_script(),
            output: default_lint_output(),
            include_notes: default_include_notes(),
            timeout_seconds: None,
        }
    }
}

fn default_lint_script() -> PathBuf {
    PathBuf::from("./lint_files.sh")
}

fn default_lint_output() -> PathBuf {
    PathBuf::from("lint_report.md")
}

fn default_include_notes() -> bool {
    true
}

/// Test harness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestsConfig {
    /// Directory scanned for `test_*.c` files.
    #[serde(default = "default_tests_dir")]
    pub dir: PathBuf,

    /// Execution script checked for filename references.
    #[serde(default = "default_run_script")]
    pub run_script: PathBuf,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            dir: default_tests_dir(),
            run_script: default_run_script(),
        }
    }
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from("Tests")
}

fn default_run_script() -> PathBuf {
    PathBuf::from("run_tests.sh")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists
    /// but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".chipcheck.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only
    /// explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if args.verbose {
            self.general.verbose = true;
        }

        match &args.command {
            crate::cli::Command::Lint(lint) => {
                if let Some(ref script) = lint.script {
                    self.lint.script = script.clone();
                }
                if let Some(ref output) = lint.output {
                    self.lint.output = output.clone();
                }
                if lint.notes {
                    self.lint.include_notes = true;
                } else if lint.no_notes {
                    self.lint.include_notes = false;
                }
                if let Some(timeout) = lint.timeout {
                    self.lint.timeout_seconds = Some(timeout);
                }
            }
            crate::cli::Command::SyncTests(sync) => {
                if let Some(ref dir) = sync.tests_dir {
                    self.tests.dir = dir.clone();
                }
                if let Some(ref script) = sync.run_script {
                    self.tests.run_script = script.clone();
                }
            }
            crate::cli::Command::InitConfig => {}
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
