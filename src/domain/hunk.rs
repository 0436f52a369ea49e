use serde::{Deserialize, Serialize};

/// Kind of a single line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Unchanged line present on both sides.
    Context,
    /// Line added in the post-image.
    Added,
    /// Line removed from the pre-image.
    Removed,
}

/// One line of a hunk with its pre/post line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkLine {
    pub kind: LineKind,
    /// Line content without the leading diff marker.
    pub content: String,
    /// Line number in the pre-image (None for additions).
    pub old_line: Option<u32>,
    /// Line number in the post-image (None for removals).
    pub new_line: Option<u32>,
}

/// A contiguous block of edits within one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Starting line in the pre-image.
    pub old_start: u32,
    /// Number of pre-image lines covered.
    pub old_lines: u32,
    /// Starting line in the post-image.
    pub new_start: u32,
    /// Number of post-image lines covered.
    pub new_lines: u32,
    /// Ordered line edits as they appear in the diff.
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Inclusive post-image line range covered by this hunk.
    pub fn new_range(&self) -> (u32, u32) {
        let end = self.new_start + self.new_lines.saturating_sub(1);
        (self.new_start, end)
    }

    pub fn contains_new_line(&self, line: u32) -> bool {
        let (start, end) = self.new_range();
        line >= start && line <= end
    }

    /// Unchanged context lines within a window around a post-image line range.
    ///
    /// Used to capture the surroundings of a finding so it can be re-located
    /// after line drift in later revisions.
    pub fn context_window(&self, line_start: u32, line_end: u32, radius: u32) -> Vec<String> {
        let lo = line_start.saturating_sub(radius);
        let hi = line_end + radius;
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Context)
            .filter(|l| l.new_line.map(|n| n >= lo && n <= hi).unwrap_or(false))
            .map(|l| l.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

/// All hunks for one changed file, in diff order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Post-image path (pre-image path for deletions), without a/ b/ prefixes.
    pub path: String,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    pub fn additions(&self) -> u32 {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == LineKind::Added)
            .count() as u32
    }

    pub fn deletions(&self) -> u32 {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == LineKind::Removed)
            .count() as u32
    }

    /// Hunk containing a post-image line, if any.
    pub fn hunk_at_new_line(&self, line: u32) -> Option<&Hunk> {
        self.hunks.iter().find(|h| h.contains_new_line(line))
    }
}
