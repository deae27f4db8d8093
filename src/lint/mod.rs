//! Lint output aggregation.
//!
//! Turns the unstructured output stream of the project's lint launcher
//! into classified findings grouped by check identifier.

pub mod classify;
pub mod runner;

pub use classify::{Classified, Classifier};
pub use runner::{run_and_collect, LintError};

use crate::models::{CheckGroup, Finding, LintScan, ToolKind};
use std::collections::HashMap;

/// Classify every line of the raw tool output in one linear pass.
pub fn scan_output(raw: &str, classifier: &Classifier) -> LintScan {
    let mut scan = LintScan::default();

    for line in raw.lines() {
        match classifier.classify(line) {
            Some(Classified::Finding(finding)) => scan.findings.push(finding),
            Some(Classified::Unclassified(kept)) => scan.unclassified.push(kept),
            None => {}
        }
    }

    scan
}

/// Group one tool's findings by check identifier.
///
/// Groups are ordered by descending member count, ties broken by check
/// id ascending; findings inside a group keep their stream order.
pub fn group_by_check(findings: &[Finding], tool: ToolKind) -> Vec<CheckGroup> {
    let mut grouped: HashMap<String, Vec<Finding>> = HashMap::new();

    for finding in findings.iter().filter(|f| f.tool == tool) {
        grouped
            .entry(finding.check.clone())
            .or_default()
            .push(finding.clone());
    }

    let mut groups: Vec<CheckGroup> = grouped
        .into_iter()
        .map(|(check, findings)| CheckGroup { check, findings })
        .collect();

    groups.sort_by(|a, b| {
        b.findings
            .len()
            .cmp(&a.findings.len())
            .then_with(|| a.check.cmp(&b.check))
    });

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_finding(tool: ToolKind, check: &str, line: u32) -> Finding {
        Finding {
            tool,
            file: "Core/Src/main.c".to_string(),
            line,
            severity: "warning".to_string(),
            message: format!("message at {}", line),
            check: check.to_string(),
        }
    }

    #[test]
    fn test_scan_output_splits_buckets() {
        let classifier = Classifier::new(PathBuf::from("/work"), true);
        let raw = "\
Core/Src/main.c:148:36: warning: name too short [readability-identifier-length]
[Core/Src/storage.c:100]: (error) Null pointer dereference [nullPointer]
ld: error: undefined symbol fooBar
Processing Core/Src/main.c...
2 warnings generated.
";

        let scan = scan_output(raw, &classifier);
        assert_eq!(scan.findings.len(), 2);
        assert_eq!(scan.unclassified, vec!["ld: error: undefined symbol fooBar"]);
        assert_eq!(scan.total_issues(), 3);
    }

    #[test]
    fn test_group_ordering_count_desc_then_check_asc() {
        let findings = vec![
            make_finding(ToolKind::ClangTidy, "bravo-check", 1),
            make_finding(ToolKind::ClangTidy, "alpha-check", 2),
            make_finding(ToolKind::ClangTidy, "bravo-check", 3),
            make_finding(ToolKind::ClangTidy, "charlie-check", 4),
            make_finding(ToolKind::ClangTidy, "charlie-check", 5),
        ];

        let groups = group_by_check(&findings, ToolKind::ClangTidy);
        let order: Vec<&str> = groups.iter().map(|g| g.check.as_str()).collect();

        // bravo and charlie both have 2 members; the tie breaks on id.
        assert_eq!(order, vec!["bravo-check", "charlie-check", "alpha-check"]);
    }

    #[test]
    fn test_grouping_filters_by_tool_and_keeps_stream_order() {
        let findings = vec![
            make_finding(ToolKind::ClangTidy, "a-check", 10),
            make_finding(ToolKind::Cppcheck, "nullPointer", 20),
            make_finding(ToolKind::ClangTidy, "a-check", 5),
        ];

        let groups = group_by_check(&findings, ToolKind::ClangTidy);
        assert_eq!(groups.len(), 1);

        // Stream order inside the group, not line order.
        let lines: Vec<u32> = groups[0].findings.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![10, 5]);

        let cpp_groups = group_by_check(&findings, ToolKind::Cppcheck);
        assert_eq!(cpp_groups.len(), 1);
        assert_eq!(cpp_groups[0].check, "nullPointer");
    }
}
