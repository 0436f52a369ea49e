use crate::domain::Finding;
use std::cmp::Reverse;

/// Findings in report display order: severity descending, then file path,
/// then ascending start line: diff reading order, never regrouped.
pub fn findings_in_display_order(findings: &[Finding]) -> Vec<&Finding> {
    let mut sorted: Vec<_> = findings.iter().collect();
    sorted.sort_by_key(|f| {
        (
            Reverse(f.severity.rank()),
            f.file.clone(),
            f.line_start,
            f.line_end,
            f.title.clone(),
        )
    });
    sorted
}
