//! Diff normalizer - parse a unified diff into ordered file hunks.
//!
//! Output order mirrors diff reading order: files as they appear in the
//! input, hunks ascending by post-image start line. An unparseable hunk
//! header fails the whole parse rather than being skipped.

use crate::domain::{FileDiff, Hunk, HunkLine, LineKind, ReviewError};
use once_cell::sync::Lazy;
use regex::Regex;
use unidiff::PatchSet;

static HUNK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@ -\d+(,\d+)? \+\d+(,\d+)? @@").unwrap());

/// Parse a unified diff into normalized per-file hunks.
///
/// Pure transform; the same input always yields the same output. An empty
/// input is a valid empty changeset.
pub fn parse_diff(diff_text: &str) -> Result<Vec<FileDiff>, ReviewError> {
    let trimmed = diff_text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    // unidiff skips hunk lines it cannot parse, so a corrupt header would
    // come back as a file with zero hunks instead of an error. Only hunk
    // headers start with `@@`; check them before handing off.
    for line in trimmed.lines() {
        if line.starts_with("@@") && !HUNK_HEADER.is_match(line) {
            return Err(ReviewError::MalformedDiff(format!(
                "unparseable hunk header: {line}"
            )));
        }
    }

    let mut patch_set = PatchSet::new();
    patch_set
        .parse(trimmed)
        .map_err(|err| ReviewError::MalformedDiff(err.to_string()))?;

    if patch_set.files().is_empty() {
        return Err(ReviewError::MalformedDiff(
            "no file sections found in diff".to_string(),
        ));
    }

    let mut results = Vec::new();
    for file in patch_set.files() {
        let mut path = file
            .target_file
            .strip_prefix("b/")
            .unwrap_or(&file.target_file);
        if path == "dev/null" || path == "/dev/null" {
            path = file
                .source_file
                .strip_prefix("a/")
                .unwrap_or(&file.source_file);
        }

        let mut hunks = Vec::new();
        for hunk in file.hunks() {
            let mut lines = Vec::new();
            for line in hunk.lines() {
                let kind = match line.line_type.as_str() {
                    unidiff::LINE_TYPE_ADDED => LineKind::Added,
                    unidiff::LINE_TYPE_REMOVED => LineKind::Removed,
                    _ => LineKind::Context,
                };
                lines.push(HunkLine {
                    kind,
                    content: line.value.clone(),
                    old_line: line.source_line_no.map(|n| n as u32),
                    new_line: line.target_line_no.map(|n| n as u32),
                });
            }
            hunks.push(Hunk {
                old_start: hunk.source_start as u32,
                old_lines: hunk.source_length as u32,
                new_start: hunk.target_start as u32,
                new_lines: hunk.target_length as u32,
                lines,
            });
        }

        // unidiff keeps hunks in input order; a well-formed diff is already
        // ascending, but normalize anyway so downstream can rely on it.
        hunks.sort_by_key(|h| h.new_start);

        results.push(FileDiff {
            path: path.to_string(),
            hunks,
        });
    }

    Ok(results)
}

/// Paths of all files touched by a changeset, in diff order.
pub fn changed_paths(files: &[FileDiff]) -> Vec<String> {
    files.iter().map(|f| f.path.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"diff --git a/src/main.rs b/src/main.rs
index abc123..def456 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@
 fn main() {
-    println!("Hello");
+    println!("Hello, World!");
+    println!("Goodbye!");
 }
"#;

    #[test]
    fn test_parse_simple_diff() {
        let files = parse_diff(SIMPLE).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/main.rs");
        assert_eq!(files[0].additions(), 2);
        assert_eq!(files[0].deletions(), 1);
        assert_eq!(files[0].hunks.len(), 1);
        assert_eq!(files[0].hunks[0].new_start, 1);
        assert_eq!(files[0].hunks[0].new_lines, 4);
    }

    #[test]
    fn test_parse_multiple_files_in_order() {
        let diff = r#"diff --git a/file1.rs b/file1.rs
--- a/file1.rs
+++ b/file1.rs
@@ -1 +1 @@
-old
+new
diff --git a/file2.rs b/file2.rs
--- a/file2.rs
+++ b/file2.rs
@@ -1 +1,2 @@
 existing
+added
"#;
        let files = parse_diff(diff).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "file1.rs");
        assert_eq!(files[1].path, "file2.rs");
    }

    #[test]
    fn test_line_numbers_tracked() {
        let files = parse_diff(SIMPLE).unwrap();
        let hunk = &files[0].hunks[0];
        let added: Vec<_> = hunk
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Added)
            .collect();
        assert_eq!(added[0].new_line, Some(2));
        assert_eq!(added[0].old_line, None);
        assert_eq!(added[1].new_line, Some(3));
    }

    #[test]
    fn test_malformed_hunk_header_is_fatal() {
        let diff = r#"diff --git a/file1.rs b/file1.rs
--- a/file1.rs
+++ b/file1.rs
@@ not a header @@
-old
+new
"#;
        let err = parse_diff(diff).unwrap_err();
        assert!(matches!(err, ReviewError::MalformedDiff(_)));
    }

    #[test]
    fn test_hunk_header_with_section_heading_is_accepted() {
        let diff = r#"diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -10,2 +10,3 @@ fn helper() {
 let x = 1;
+let y = 2;
 x
"#;
        let files = parse_diff(diff).unwrap();
        assert_eq!(files[0].hunks.len(), 1);
        assert_eq!(files[0].hunks[0].new_start, 10);
    }

    #[test]
    fn test_empty_diff_is_empty_changeset() {
        assert!(parse_diff("").unwrap().is_empty());
        assert!(parse_diff("   \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = parse_diff(SIMPLE).unwrap();
        let b = parse_diff(SIMPLE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deleted_file_uses_source_path() {
        let diff = r#"diff --git a/gone.rs b/gone.rs
--- a/gone.rs
+++ /dev/null
@@ -1,2 +0,0 @@
-fn gone() {}
-
"#;
        let files = parse_diff(diff).unwrap();
        assert_eq!(files[0].path, "gone.rs");
    }

    #[test]
    fn test_context_window_capture() {
        let files = parse_diff(SIMPLE).unwrap();
        let hunk = &files[0].hunks[0];
        let ctx = hunk.context_window(2, 3, 2);
        assert!(ctx.contains(&"fn main() {".to_string()));
        assert!(ctx.contains(&"}".to_string()));
    }
}
