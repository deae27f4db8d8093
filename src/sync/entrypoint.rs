//! Entry-point regeneration for Unity test files.
//!
//! A test file's `main` must invoke exactly the `test_*` functions the
//! file declares. The existing `main` is located by its signature and
//! its body's extent by a brace depth counter over the raw text; a
//! full C parse is out of scope.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;
use thiserror::Error;

/// Raised when an existing entry point's braces never balance before
/// end of text.
///
/// Braces inside string or comment literals are not distinguished from
/// structural braces; a file tripping on that limitation lands here
/// instead of being rewritten.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unbalanced braces in existing entry point")]
pub struct UnbalancedBraces;

// Matches: void test_Name(void), flexible whitespace
fn test_decl_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^void\s+(test_\w+)\s*\(\s*void\s*\)")
            .expect("test declaration pattern compiles")
    })
}

fn main_signature_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"int\s+main\s*\(\s*void\s*\)\s*\{").expect("main signature pattern compiles")
    })
}

/// Extract declared test-function names, deduplicated and sorted
/// lexicographically.
pub fn discover_tests(content: &str) -> Vec<String> {
    let mut names: Vec<String> = test_decl_pattern()
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect();

    names.sort();
    names.dedup();
    names
}

/// Render the canonical entry point for a sorted name list.
///
/// Pure and deterministic: the same names always produce byte-identical
/// output.
pub fn build_entry_point(names: &[String]) -> String {
    let mut lines = vec![
        "int main(void) {".to_string(),
        "    UNITY_BEGIN();".to_string(),
    ];
    for name in names {
        lines.push(format!("    RUN_TEST({});", name));
    }
    lines.push("    return UNITY_END();".to_string());
    lines.push("}".to_string());

    lines.join("\n")
}

/// Locate the span of the first existing entry point, if any.
///
/// The span runs from the `int main(void)` signature to one past the
/// brace that returns the depth counter to zero. The counter arms at
/// the signature's opening brace and tracks every `{`/`}` byte after
/// it, so nested blocks are spanned whole.
pub fn locate_entry_point(content: &str) -> Result<Option<Range<usize>>, UnbalancedBraces> {
    let Some(signature) = main_signature_pattern().find(content) else {
        return Ok(None);
    };

    let mut depth: i32 = 0;
    let mut entered = false;

    for (offset, byte) in content.as_bytes()[signature.start()..].iter().enumerate() {
        match byte {
            b'{' => {
                depth += 1;
                entered = true;
            }
            b'}' => depth -= 1,
            _ => {}
        }
        if entered && depth == 0 {
            return Ok(Some(signature.start()..signature.start() + offset + 1));
        }
    }

    Err(UnbalancedBraces)
}

/// Rewrite `content` so its entry point runs exactly `names`.
///
/// An existing entry point is replaced in place, surrounding text
/// preserved byte-for-byte; otherwise the block is appended after the
/// file content. Applying the same name set twice yields identical
/// output.
pub fn synchronize(content: &str, names: &[String]) -> Result<String, UnbalancedBraces> {
    let block = build_entry_point(names);

    match locate_entry_point(content)? {
        Some(span) => {
            let mut updated = String::with_capacity(content.len() + block.len());
            updated.push_str(&content[..span.start]);
            updated.push_str(&block);
            updated.push_str(&content[span.end..]);
            Ok(updated)
        }
        None => {
            let mut updated = content.to_string();
            if !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push('\n');
            updated.push_str(&block);
            updated.push('\n');
            Ok(updated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_discover_sorts_lexicographically() {
        let content = "\
void test_Zeta(void) {}
void test_Alpha(void) {}
void test_Mid(void) {}
";
        assert_eq!(
            discover_tests(content),
            names(&["test_Alpha", "test_Mid", "test_Zeta"])
        );
    }

    #[test]
    fn test_discover_deduplicates_and_allows_flexible_whitespace() {
        let content = "\
void  test_Once ( void )
{
}

void test_Once(void) {}
";
        assert_eq!(discover_tests(content), names(&["test_Once"]));
    }

    #[test]
    fn test_discover_ignores_non_test_functions() {
        let content = "\
void helper_setup(void) {}
static void test_NotAtLineStart(void) {}
void test_Real(void) {}
";
        // Declarations must start the line; static helpers don't count.
        assert_eq!(discover_tests(content), names(&["test_Real"]));
    }

    #[test]
    fn test_build_entry_point_is_canonical() {
        let block = build_entry_point(&names(&["test_Alpha", "test_Beta"]));
        assert_eq!(
            block,
            "int main(void) {\n    UNITY_BEGIN();\n    RUN_TEST(test_Alpha);\n    RUN_TEST(test_Beta);\n    return UNITY_END();\n}"
        );
    }

    #[test]
    fn test_locate_spans_nested_braces() {
        let content = "\
void test_A(void) {}

int main(void) {
    UNITY_BEGIN();
    if (1) {
        RUN_TEST(test_A);
    }
    return UNITY_END();
}
/* trailer */
";
        let span = locate_entry_point(content).unwrap().unwrap();
        let body = &content[span.clone()];
        assert!(body.starts_with("int main(void) {"));
        assert!(body.ends_with("return UNITY_END();\n}"));
        assert!(content[span.end..].contains("/* trailer */"));
    }

    #[test]
    fn test_locate_absent_entry_point() {
        assert_eq!(locate_entry_point("void test_A(void) {}\n"), Ok(None));
    }

    #[test]
    fn test_locate_unbalanced_is_error() {
        let content = "int main(void) {\n    UNITY_BEGIN();\n    if (1) {\n";
        assert_eq!(locate_entry_point(content), Err(UnbalancedBraces));
    }

    #[test]
    fn test_synchronize_appends_when_absent() {
        let content = "void test_Beta(void) {}\nvoid test_Alpha(void) {}";
        let updated = synchronize(content, &discover_tests(content)).unwrap();

        assert!(updated.starts_with(content));
        // Alpha runs before Beta regardless of declaration order.
        let alpha = updated.find("RUN_TEST(test_Alpha);").unwrap();
        let beta = updated.find("RUN_TEST(test_Beta);").unwrap();
        assert!(alpha < beta);
        assert!(updated.ends_with("}\n"));
    }

    #[test]
    fn test_synchronize_replaces_existing_block() {
        let content = "\
#include \"unity.h\"

void test_New(void) {}

int main(void) {
    UNITY_BEGIN();
    RUN_TEST(test_Old);
    return UNITY_END();
}

/* keep me */
";
        let updated = synchronize(content, &discover_tests(content)).unwrap();

        assert!(updated.contains("RUN_TEST(test_New);"));
        assert!(!updated.contains("RUN_TEST(test_Old);"));
        assert!(updated.starts_with("#include \"unity.h\""));
        assert!(updated.ends_with("/* keep me */\n"));
    }

    #[test]
    fn test_synchronize_is_idempotent() {
        let content = "void test_B(void) {}\nvoid test_A(void) {}\n";
        let tests = discover_tests(content);

        let once = synchronize(content, &tests).unwrap();
        let twice = synchronize(&once, &tests).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_synchronize_unchanged_when_already_canonical() {
        let content = "void test_A(void) {}\n";
        let tests = discover_tests(content);

        let synced = synchronize(content, &tests).unwrap();
        let resynced = synchronize(&synced, &tests).unwrap();
        assert_eq!(synced, resynced);
        // The canonical block is found and replaced with itself.
        assert!(locate_entry_point(&synced).unwrap().is_some());
    }

    #[test]
    fn test_synchronize_leaves_unbalanced_untouched() {
        let content = "void test_A(void) {}\nint main(void) { if (1) {\n";
        assert_eq!(
            synchronize(content, &discover_tests(content)),
            Err(UnbalancedBraces)
        );
    }
}
