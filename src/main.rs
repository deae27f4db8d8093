//! ChipCheck - build-quality gate for embedded firmware.
//!
//! Two independent pipelines: `lint` aggregates clang-tidy/cppcheck
//! output into a categorized Markdown report; `sync-tests` regenerates
//! each Unity test file's entry point and verifies every test file is
//! wired into the execution script.
//!
//! Exit codes:
//!   0 - Gate passed (no lint issues / harness consistent)
//!   1 - Runtime error (launcher failed to start, I/O fault, etc.)
//!   2 - Gate failed (lint issues found, malformed entry point, or
//!       test file missing from the execution script)

mod cli;
mod config;
mod lint;
mod models;
mod report;
mod sync;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, LintArgs, OutputFormat, SyncArgs};
use config::Config;
use lint::Classifier;
use models::{LintReport, Outcome, ReportMetadata, ToolKind};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("ChipCheck v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = match &args.command {
        Command::Lint(lint_args) => run_lint(&args, lint_args).await,
        Command::SyncTests(sync_args) => run_sync(&args, sync_args),
        Command::InitConfig => Ok(0),
    };

    match result {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .chipcheck.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".chipcheck.toml");

    if path.exists() {
        eprintln!("⚠️  .chipcheck.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .chipcheck.toml")?;

    println!("✅ Created .chipcheck.toml with default settings.");
    println!("   Edit it to customize the lint script, report path, and test directory.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .chipcheck.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Run the lint aggregation pipeline. Returns exit code (0 or 2).
async fn run_lint(args: &Args, lint_args: &LintArgs) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(args)?;
    config.merge_with_args(args);

    let script = config.lint.script.clone();
    let timeout = config.lint.timeout_seconds.map(Duration::from_secs);

    println!("🔍 Running {}...", script.display());
    let raw_output = lint::run_and_collect(&script, timeout).await?;

    println!("📋 Parsing output...");
    let root = std::env::current_dir().context("Failed to resolve working directory")?;
    let classifier = Classifier::new(root, config.lint.include_notes);
    let scan = lint::scan_output(&raw_output, &classifier);

    let lint_report = LintReport {
        metadata: ReportMetadata {
            script: script.display().to_string(),
            run_date: Utc::now(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
            total_issues: scan.total_issues(),
        },
        clang_tidy: lint::group_by_check(&scan.findings, ToolKind::ClangTidy),
        cppcheck: lint::group_by_check(&scan.findings, ToolKind::Cppcheck),
        unclassified: scan.unclassified.clone(),
        includes_notes: config.lint.include_notes,
    };

    let rendered = match lint_args.format {
        OutputFormat::Markdown => report::generate_markdown_report(&lint_report),
        OutputFormat::Json => report::generate_json_report(&lint_report)?,
    };
    report::write_report(&config.lint.output, &rendered)?;

    println!("📝 Report generated: {}", config.lint.output.display());
    println!("\n📊 Lint Summary:");
    println!("   Clang-Tidy categories: {}", lint_report.clang_tidy.len());
    println!("   Cppcheck categories: {}", lint_report.cppcheck.len());
    println!("   Grammar findings: {}", lint_report.total_findings());
    println!("   Uncategorized lines: {}", lint_report.unclassified.len());
    println!("   Total issues: {}", scan.total_issues());

    match scan.outcome() {
        Outcome::Fail => {
            eprintln!("\n⛔ FAILURE: Found {} lint issues.", scan.total_issues());
        }
        Outcome::Pass => {
            println!("\n✅ SUCCESS: No lint issues found.");
        }
    }
    Ok(scan.outcome().exit_code())
}

/// Run the test harness synchronizer. Returns exit code (0 or 2).
fn run_sync(args: &Args, sync_args: &SyncArgs) -> Result<i32> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    let options = sync::SyncOptions {
        tests_dir: config.tests.dir.clone(),
        run_script: config.tests.run_script.clone(),
        check_only: sync_args.check,
    };

    println!(
        "🧪 Synchronizing test harness in {}...",
        options.tests_dir.display()
    );
    let sync_report = sync::sync_all(&options)?;

    if sync_report.updated.is_empty() {
        println!("✨ All files are up to date.");
    } else {
        let verb = if sync_args.check { "Would update" } else { "Updated" };
        println!("🔄 {} {} file(s):", verb, sync_report.updated.len());
        for name in &sync_report.updated {
            println!("   - {}", name);
        }
    }

    for name in &sync_report.no_tests {
        println!("⚠️  Warning: No tests found in {}", name);
    }

    for name in &sync_report.malformed {
        eprintln!("❌ Could not parse entry point in {}", name);
    }

    if !sync_report.missing_from_script.is_empty() {
        eprintln!(
            "\n⛔ The following test files are not included in {}:",
            options.run_script.display()
        );
        for name in &sync_report.missing_from_script {
            eprintln!("   - {}", name);
        }
        eprintln!("\nAdd compilation and execution steps for these files.");
    }

    if sync_report.is_success() {
        println!("✅ Test harness is consistent.");
        Ok(0)
    } else {
        Ok(2)
    }
}
