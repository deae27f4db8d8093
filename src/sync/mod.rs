//! Test harness synchronization.
//!
//! Discovers `test_*.c` files, regenerates each file's entry point
//! from the test functions it declares, and verifies that every test
//! file is referenced by the execution script.

pub mod entrypoint;

pub use entrypoint::{
    build_entry_point, discover_tests, locate_entry_point, synchronize, UnbalancedBraces,
};

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Options for one synchronization pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory scanned for `test_*.c` files.
    pub tests_dir: PathBuf,
    /// Execution script checked for filename references.
    pub run_script: PathBuf,
    /// Report what would change without rewriting anything.
    pub check_only: bool,
}

/// Per-file result of the sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Entry point rewritten (or would be, under check-only).
    Updated,
    /// Entry point already canonical; no write performed.
    Unchanged,
    /// No test functions declared; file left untouched.
    NoTests,
    /// Existing entry point never balances; file left untouched.
    Malformed,
}

/// Aggregate outcome of one synchronization pass.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Files whose entry point was (or would be) rewritten.
    pub updated: Vec<String>,
    /// Files already canonical.
    pub unchanged: usize,
    /// Files declaring no test functions.
    pub no_tests: Vec<String>,
    /// Files whose existing entry point could not be parsed.
    pub malformed: Vec<String>,
    /// Test files not referenced by the execution script.
    pub missing_from_script: Vec<String>,
}

impl SyncReport {
    /// The pass succeeds only when every entry point resolved and every
    /// test file is wired into the execution script. Rewrites alone do
    /// not fail the gate.
    pub fn is_success(&self) -> bool {
        self.malformed.is_empty() && self.missing_from_script.is_empty()
    }
}

/// Find all `test_*.c` files directly inside `dir`, sorted by name.
pub fn discover_test_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with("test_") && name.ends_with(".c") {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Run the full synchronization pass.
///
/// Per-file grammar and balance problems are collected into the report;
/// only filesystem faults escalate.
pub fn sync_all(options: &SyncOptions) -> Result<SyncReport> {
    let test_files = discover_test_files(&options.tests_dir)?;
    if test_files.is_empty() {
        anyhow::bail!(
            "No test files found in {} directory",
            options.tests_dir.display()
        );
    }

    info!("Scanning {} test files", test_files.len());
    let mut report = SyncReport::default();

    for path in &test_files {
        let name = file_name(path);
        let status = sync_file(path, options.check_only)
            .with_context(|| format!("Failed to synchronize {}", path.display()))?;

        match status {
            FileStatus::Updated => report.updated.push(name),
            FileStatus::Unchanged => report.unchanged += 1,
            FileStatus::NoTests => {
                warn!("No tests found in {}", name);
                report.no_tests.push(name);
            }
            FileStatus::Malformed => {
                warn!("Could not parse entry point in {}", name);
                report.malformed.push(name);
            }
        }
    }

    let registry = fs::read_to_string(&options.run_script)
        .with_context(|| format!("Failed to read {}", options.run_script.display()))?;
    let filenames: Vec<String> = test_files.iter().map(|p| file_name(p)).collect();
    report.missing_from_script = check_inclusion(&registry, &filenames);

    Ok(report)
}

/// Synchronize a single file.
fn sync_file(path: &Path, check_only: bool) -> Result<FileStatus> {
    let content = fs::read_to_string(path)?;

    let tests = entrypoint::discover_tests(&content);
    if tests.is_empty() {
        return Ok(FileStatus::NoTests);
    }

    let updated = match entrypoint::synchronize(&content, &tests) {
        Ok(updated) => updated,
        Err(UnbalancedBraces) => return Ok(FileStatus::Malformed),
    };

    // Cheap up-to-date short-circuit: write only on difference.
    if updated == content {
        return Ok(FileStatus::Unchanged);
    }

    if !check_only {
        write_atomic(path, &updated)?;
        debug!("Rewrote {}", path.display());
    }

    Ok(FileStatus::Updated)
}

/// Replace `path` with `content` in one step: the new text is staged in
/// a sibling temp file and renamed over the original. If staging or
/// persisting fails, the temp file is cleaned up and the original is
/// left untouched.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(content.as_bytes())?;
    staged.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Return the filenames absent from the execution script's text.
///
/// Literal substring containment, not a semantic reference check.
pub fn check_inclusion(registry: &str, filenames: &[String]) -> Vec<String> {
    filenames
        .iter()
        .filter(|name| !registry.contains(name.as_str()))
        .cloned()
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
