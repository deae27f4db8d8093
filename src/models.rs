//! Data models for the quality gate.
//!
//! This module contains the core data structures shared by the lint
//! aggregation pipeline: findings, check groups, and the report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tool of origin for a classified diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// Compiler-style diagnostics: `file:line:col: severity: message [check]`
    ClangTidy,
    /// Bracketed-location diagnostics: `[file:line]: (severity) message [id]`
    Cppcheck,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::ClangTidy => write!(f, "Clang-Tidy"),
            ToolKind::Cppcheck => write!(f, "Cppcheck"),
        }
    }
}

/// A single diagnostic occurrence recovered from the tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Which grammar produced this finding.
    pub tool: ToolKind,
    /// File path, relative to the working root when possible.
    pub file: String,
    /// Line number (1-indexed, as reported by the tool).
    pub line: u32,
    /// Severity label kept verbatim ("warning", "error", "style", ...).
    pub severity: String,
    /// Free-text diagnostic message.
    pub message: String,
    /// Check identifier, e.g. `readability-identifier-length` or `nullPointer`.
    pub check: String,
}

/// Result of one classification pass over the raw tool output.
///
/// Built during a single linear scan and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct LintScan {
    /// Lines that matched one of the two grammars, in stream order.
    pub findings: Vec<Finding>,
    /// Diagnostic-looking lines that matched neither grammar, verbatim.
    pub unclassified: Vec<String>,
}

impl LintScan {
    /// Combined issue tally: grammar findings plus unclassified entries.
    pub fn total_issues(&self) -> usize {
        self.findings.len() + self.unclassified.len()
    }

    /// The pass/fail signal. Any issue at all fails the gate.
    pub fn outcome(&self) -> Outcome {
        if self.total_issues() > 0 {
            Outcome::Fail
        } else {
            Outcome::Pass
        }
    }
}

/// Binary gate outcome driving the process exit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    /// Process exit code: 0 for a clean gate, 2 for issues found.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 2,
        }
    }
}

/// Findings sharing one check identifier, insertion order preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckGroup {
    pub check: String,
    pub findings: Vec<Finding>,
}

/// Metadata about one lint run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// The analysis launcher that was invoked.
    pub script: String,
    /// Date and time of the run.
    pub run_date: DateTime<Utc>,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
    /// Combined count of findings and unclassified entries.
    pub total_issues: usize,
}

/// The complete categorized lint report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    pub metadata: ReportMetadata,
    /// Clang-Tidy groups, ordered by descending member count.
    pub clang_tidy: Vec<CheckGroup>,
    /// Cppcheck groups, ordered by descending member count.
    pub cppcheck: Vec<CheckGroup>,
    /// Unclassified diagnostic lines, verbatim.
    pub unclassified: Vec<String>,
    /// Whether `note:` lines were eligible for the unclassified bucket.
    pub includes_notes: bool,
}

impl LintReport {
    /// Count of findings across both tools' groups.
    pub fn total_findings(&self) -> usize {
        self.clang_tidy
            .iter()
            .chain(self.cppcheck.iter())
            .map(|g| g.findings.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_finding(tool: ToolKind, check: &str) -> Finding {
        Finding {
            tool,
            file: "Core/Src/main.c".to_string(),
            line: 42,
            severity: "warning".to_string(),
            message: "something looks off".to_string(),
            check: check.to_string(),
        }
    }

    #[test]
    fn test_tool_kind_display() {
        assert_eq!(ToolKind::ClangTidy.to_string(), "Clang-Tidy");
        assert_eq!(ToolKind::Cppcheck.to_string(), "Cppcheck");
    }

    #[test]
    fn test_scan_outcome() {
        let mut scan = LintScan::default();
        assert_eq!(scan.outcome(), Outcome::Pass);
        assert_eq!(scan.outcome().exit_code(), 0);

        scan.unclassified.push("error: stray line".to_string());
        assert_eq!(scan.outcome(), Outcome::Fail);
        assert_eq!(scan.outcome().exit_code(), 2);
    }

    #[test]
    fn test_scan_total_counts_both_buckets() {
        let scan = LintScan {
            findings: vec![make_finding(ToolKind::ClangTidy, "bugprone-sizeof")],
            unclassified: vec!["warning: unparsed".to_string()],
        };
        assert_eq!(scan.total_issues(), 2);
    }

    #[test]
    fn test_report_total_findings() {
        let report = LintReport {
            metadata: ReportMetadata {
                script: "./lint_files.sh".to_string(),
                run_date: Utc::now(),
                duration_seconds: 1.0,
                total_issues: 3,
            },
            clang_tidy: vec![CheckGroup {
                check: "readability-identifier-length".to_string(),
                findings: vec![
                    make_finding(ToolKind::ClangTidy, "readability-identifier-length"),
                    make_finding(ToolKind::ClangTidy, "readability-identifier-length"),
                ],
            }],
            cppcheck: vec![CheckGroup {
                check: "nullPointer".to_string(),
                findings: vec![make_finding(ToolKind::Cppcheck, "nullPointer")],
            }],
            unclassified: Vec::new(),
            includes_notes: true,
        };
        assert_eq!(report.total_findings(), 3);
    }
}
