//! Severity policy: deterministic overrides applied after the reviewer.
//!
//! The reviewer's severity assessment is passed through unchanged for
//! production code; findings in test code are clamped to low. The policy is
//! a pure, total function over (finding, file classification) and is
//! independent of category.

use crate::domain::{Finding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

/// Classification of a changed file for severity purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Production,
    Test,
}

static TEST_STEM: Lazy<Regex> = Lazy::new(|| {
    // Filename stems like FooTest, FooTests, FooSpec, foo_test, test_foo.
    // Case-sensitive so "contest" does not count as a test suffix.
    Regex::new(r"(^test_|_tests?$|_spec$|(Tests?|Spec)$)").unwrap()
});

const TEST_DIR_SEGMENTS: &[&str] = &[
    "test",
    "tests",
    "__tests__",
    "spec",
    "specs",
    "testdata",
    "test_fixtures",
];

/// Classify a path as production or test code.
///
/// Heuristics, in order: test directory segments anywhere in the path, then
/// test-style filename stems/suffixes.
pub fn classify_path(path: &str) -> FileKind {
    let normalized = path.replace('\\', "/");

    for segment in normalized.split('/') {
        if TEST_DIR_SEGMENTS
            .iter()
            .any(|dir| segment.eq_ignore_ascii_case(dir))
        {
            return FileKind::Test;
        }
    }

    let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let lowered = file_name.to_lowercase();
    if TEST_STEM.is_match(stem) || lowered.contains(".test.") || lowered.contains(".spec.") {
        return FileKind::Test;
    }

    FileKind::Production
}

/// Apply the severity policy to one already-split, single-file finding.
pub fn apply_severity_policy(finding: Finding, kind: FileKind) -> Finding {
    match kind {
        FileKind::Production => finding,
        FileKind::Test => Finding {
            severity: Severity::Low,
            ..finding
        },
    }
}

/// Classify and clamp a whole finding set.
pub fn apply_severity_policy_all(findings: Vec<Finding>) -> Vec<Finding> {
    findings
        .into_iter()
        .map(|f| {
            let kind = classify_path(&f.file);
            apply_severity_policy(f, kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn finding(file: &str, severity: Severity) -> Finding {
        Finding {
            id: "f1".to_string(),
            category: Category::Correctness,
            severity,
            title: "t".to_string(),
            file: file.to_string(),
            line_start: 1,
            line_end: 1,
            symbol: None,
            explanation: String::new(),
            suggestion: String::new(),
            patch: None,
            context: Vec::new(),
            fingerprint: "fp".to_string(),
        }
    }

    #[test]
    fn classifies_test_directories() {
        assert_eq!(classify_path("tests/order_flow.rs"), FileKind::Test);
        assert_eq!(classify_path("src/__tests__/order.ts"), FileKind::Test);
        assert_eq!(classify_path("spec/models/order_spec.rb"), FileKind::Test);
        assert_eq!(classify_path("src/order.rs"), FileKind::Production);
    }

    #[test]
    fn classifies_test_filenames() {
        assert_eq!(classify_path("src/OrderTests.cs"), FileKind::Test);
        assert_eq!(classify_path("src/OrderTest.java"), FileKind::Test);
        assert_eq!(classify_path("src/OrderSpec.kt"), FileKind::Test);
        assert_eq!(classify_path("src/order.test.ts"), FileKind::Test);
        assert_eq!(classify_path("src/order_test.go"), FileKind::Test);
        assert_eq!(classify_path("src/contest.rs"), FileKind::Production);
        assert_eq!(classify_path("src/order_service.rs"), FileKind::Production);
    }

    #[test]
    fn clamps_every_severity_in_test_files() {
        for severity in [Severity::High, Severity::Medium, Severity::Low] {
            let out = apply_severity_policy(finding("OrderTests.cs", severity), FileKind::Test);
            assert_eq!(out.severity, Severity::Low);
        }
    }

    #[test]
    fn passes_production_severity_through() {
        let out = apply_severity_policy(finding("src/order.rs", Severity::High), FileKind::Production);
        assert_eq!(out.severity, Severity::High);
    }

    #[test]
    fn applies_policy_across_a_set() {
        let out = apply_severity_policy_all(vec![
            finding("src/order.rs", Severity::High),
            finding("tests/order.rs", Severity::High),
        ]);
        assert_eq!(out[0].severity, Severity::High);
        assert_eq!(out[1].severity, Severity::Low);
    }
}
