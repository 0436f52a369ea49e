use crate::infra::hash::hash64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a finding.
pub type FindingId = String;

/// Review category a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Architecture,
    Security,
    Correctness,
    Maintainability,
    Performance,
    Style,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Architecture => write!(f, "architecture"),
            Self::Security => write!(f, "security"),
            Self::Correctness => write!(f, "correctness"),
            Self::Maintainability => write!(f, "maintainability"),
            Self::Performance => write!(f, "performance"),
            Self::Style => write!(f, "style"),
        }
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "architecture" | "design" => Ok(Self::Architecture),
            "security" => Ok(Self::Security),
            "correctness" | "bug" | "logic" => Ok(Self::Correctness),
            "maintainability" | "maintenance" => Ok(Self::Maintainability),
            "performance" | "perf" => Ok(Self::Performance),
            "style" | "convention" => Ok(Self::Style),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

/// Severity assigned to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    #[default]
    Low,
}

impl Severity {
    /// Numeric rank for ordering (higher is more severe).
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "critical" | "blocker" => Ok(Self::High),
            "medium" | "moderate" => Ok(Self::Medium),
            "low" | "minor" | "info" => Ok(Self::Low),
            other => Err(format!("Unknown severity: {other}")),
        }
    }
}

/// One reported issue from a review pass.
///
/// Immutable once created; a later run supersedes a finding rather than
/// editing it. Identity across runs is carried by `fingerprint`, which
/// excludes line numbers so it survives line drift between revisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Unique identifier for this finding record.
    pub id: FindingId,
    pub category: Category,
    pub severity: Severity,
    /// Brief title of the issue.
    pub title: String,
    /// Relative path to the file, without a/ b/ prefixes.
    pub file: String,
    /// First post-image line of the affected range.
    pub line_start: u32,
    /// Last post-image line of the affected range.
    pub line_end: u32,
    /// Enclosing symbol path (e.g. `OrderService::submit`), when known.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Why this is an issue.
    pub explanation: String,
    /// What to do about it.
    pub suggestion: String,
    /// Optional unified-diff patch implementing the suggestion.
    #[serde(default)]
    pub patch: Option<String>,
    /// Unchanged context lines captured around the location at creation.
    #[serde(default)]
    pub context: Vec<String>,
    /// Location-independent identity key, stable across line drift.
    pub fingerprint: String,
}

impl Finding {
    /// Derive the content fingerprint for a finding.
    ///
    /// Built from category, normalized title, file path, and enclosing
    /// symbol. Line numbers are deliberately excluded.
    pub fn fingerprint_of(
        category: Category,
        title: &str,
        file: &str,
        symbol: Option<&str>,
    ) -> String {
        let key = format!(
            "{}|{}|{}|{}",
            category,
            normalize_title(title),
            file,
            symbol.unwrap_or("")
        );
        format!("{:016x}", hash64(&key))
    }

    pub fn line_distance(&self, other: &Self) -> u32 {
        self.line_start.abs_diff(other.line_start)
    }
}

/// Normalize a finding title for fingerprinting.
///
/// Lowercases, strips digits (titles often quote line numbers) and
/// punctuation, and collapses whitespace.
pub fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_space = true;
    for c in title.chars() {
        if c.is_alphabetic() {
            out.extend(c.to_lowercase());
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_collapses_noise() {
        assert_eq!(
            normalize_title("Unchecked overflow at line 42!"),
            "unchecked overflow at line"
        );
        assert_eq!(normalize_title("  SQL   injection "), "sql injection");
    }

    #[test]
    fn fingerprint_ignores_line_numbers_in_title() {
        let a = Finding::fingerprint_of(
            Category::Security,
            "SQL injection at line 10",
            "src/db.rs",
            Some("Db::query"),
        );
        let b = Finding::fingerprint_of(
            Category::Security,
            "SQL injection at line 57",
            "src/db.rs",
            Some("Db::query"),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_distinguishes_file_and_category() {
        let a = Finding::fingerprint_of(Category::Security, "Leak", "a.rs", None);
        let b = Finding::fingerprint_of(Category::Security, "Leak", "b.rs", None);
        let c = Finding::fingerprint_of(Category::Performance, "Leak", "a.rs", None);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
