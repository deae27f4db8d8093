//! Lint report rendering.
//!
//! This module generates the categorized Markdown report from a
//! classified lint run, plus a JSON variant for machine consumption.

use crate::models::{CheckGroup, LintReport};
use anyhow::Result;
use std::path::Path;

/// Generate the complete Markdown lint report.
pub fn generate_markdown_report(report: &LintReport) -> String {
    let mut output = String::new();

    output.push_str("# Lint Report\n\n");

    // Category counts up front: a zero here is the "all clean" signal.
    output.push_str(&format!(
        "Total Clang-Tidy Categories: {}\n",
        report.clang_tidy.len()
    ));
    output.push_str(&format!(
        "Total Cppcheck Categories: {}\n\n",
        report.cppcheck.len()
    ));

    if !report.clang_tidy.is_empty() {
        output.push_str(&generate_tool_section("Clang-Tidy Issues", &report.clang_tidy));
    }

    if !report.cppcheck.is_empty() {
        output.push_str(&generate_tool_section("Cppcheck Issues", &report.cppcheck));
    }

    if !report.unclassified.is_empty() {
        output.push_str(&generate_unclassified_section(
            &report.unclassified,
            report.includes_notes,
        ));
    }

    output
}

/// Generate one tool's section: a subsection per check group.
fn generate_tool_section(title: &str, groups: &[CheckGroup]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    for group in groups {
        section.push_str(&format!("### {} ({})\n", group.check, group.findings.len()));
        for finding in &group.findings {
            section.push_str(&format!(
                "- **[{}]({}#L{})**: {}\n",
                finding.file, finding.file, finding.line, finding.message
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the uncategorized section, lines rendered verbatim.
fn generate_unclassified_section(lines: &[String], includes_notes: bool) -> String {
    let mut section = String::new();

    section.push_str("## Uncategorized/Other Errors\n\n");
    if includes_notes {
        section.push_str("*(Includes notes and unparsed warnings)*\n\n");
    } else {
        section.push_str("*(Unparsed warnings and errors)*\n\n");
    }

    for line in lines {
        section.push_str(&format!("- `{}`\n", line));
    }

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &LintReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("Failed to write report to {}: {}", path.display(), e))
}
