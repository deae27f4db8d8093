//! Diagnostic line classification.
//!
//! The combined lint output mixes two line grammars with free-form
//! compiler noise. Each line is matched against the grammars in a
//! fixed order: Clang-Tidy first, then Cppcheck. Lines matching
//! neither but carrying a diagnostic keyword are retained verbatim;
//! everything else is dropped.

use crate::models::{Finding, ToolKind};
use regex::Regex;
use std::path::{Path, PathBuf};

/// A single classified output line.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// The line matched one of the two grammars.
    Finding(Finding),
    /// Diagnostic-looking line that matched neither grammar.
    Unclassified(String),
}

/// Line classifier for the combined lint output stream.
pub struct Classifier {
    clang_tidy: Regex,
    cppcheck: Regex,
    root: PathBuf,
    include_notes: bool,
}

impl Classifier {
    /// Create a classifier that relativizes absolute paths under `root`.
    ///
    /// When `include_notes` is set, `note:` lines are eligible for the
    /// unclassified bucket alongside warnings and errors.
    pub fn new(root: PathBuf, include_notes: bool) -> Self {
        Self {
            // Clang-Tidy: /path/file.c:148:36: warning: message [check-name]
            clang_tidy: Regex::new(r"^(.+):(\d+):\d+: (\w+): (.+) \[(.+)\]$")
                .expect("clang-tidy pattern compiles"),
            // Cppcheck: [Core/Src/main.c:100]: (warning) message [someId]
            cppcheck: Regex::new(r"^\[(.+):(\d+)\]: \((.+)\) (.+) \[(.+)\]$")
                .expect("cppcheck pattern compiles"),
            root,
            include_notes,
        }
    }

    /// Classify one line of tool output.
    ///
    /// Returns `None` for blank and informational lines. Never panics
    /// on arbitrary input: a line that partially matches a grammar
    /// falls through to the unclassified bucket.
    pub fn classify(&self, line: &str) -> Option<Classified> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(finding) = self.match_clang_tidy(line) {
            return Some(Classified::Finding(finding));
        }
        if let Some(finding) = self.match_cppcheck(line) {
            return Some(Classified::Finding(finding));
        }

        if self.is_retainable_noise(line) {
            return Some(Classified::Unclassified(line.to_string()));
        }

        None
    }

    fn match_clang_tidy(&self, line: &str) -> Option<Finding> {
        let caps = self.clang_tidy.captures(line)?;
        Some(Finding {
            tool: ToolKind::ClangTidy,
            file: self.normalize_path(&caps[1]),
            line: caps[2].parse().ok()?,
            severity: caps[3].to_string(),
            message: caps[4].to_string(),
            check: caps[5].to_string(),
        })
    }

    fn match_cppcheck(&self, line: &str) -> Option<Finding> {
        let caps = self.cppcheck.captures(line)?;
        Some(Finding {
            tool: ToolKind::Cppcheck,
            file: self.normalize_path(&caps[1]),
            line: caps[2].parse().ok()?,
            severity: caps[3].to_string(),
            message: caps[4].to_string(),
            check: caps[5].to_string(),
        })
    }

    /// A line worth keeping verbatim: carries a diagnostic keyword and
    /// is not a summary or suppression notice.
    fn is_retainable_noise(&self, line: &str) -> bool {
        let has_keyword = line.contains("warning:")
            || line.contains("error:")
            || (self.include_notes && line.contains("note:"));

        has_keyword && !line.ends_with("generated.") && !line.starts_with("Suppressed")
    }

    /// Rewrite an absolute path located under the working root as
    /// relative to it. Any other path passes through untouched.
    fn normalize_path(&self, raw: &str) -> String {
        Path::new(raw)
            .strip_prefix(&self.root)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| raw.to_string())
    }
}
