//! Report renderer: reconciled findings as a Markdown document.
//!
//! Rendering is a pure function of its input; the same findings and
//! reconciliation always produce byte-identical output, so reports can be
//! regression-tested by snapshot comparison.

use super::ordering::findings_in_display_order;
use crate::domain::{CurrentStatus, Finding, ReconciliationResult, Severity};

pub struct ReportData<'a> {
    /// Current findings after the severity policy.
    pub findings: &'a [Finding],
    pub reconciliation: &'a ReconciliationResult,
    /// Collaborator findings dropped during validation.
    pub dropped: u32,
    /// PR identifier, shown in the heading.
    pub pr_id: &'a str,
    /// Revision range label, shown in the heading.
    pub diff_range: &'a str,
}

pub struct ReportRenderer;

impl ReportRenderer {
    pub fn render(data: &ReportData<'_>) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Review: {}\n\n", data.pr_id));
        md.push_str(&format!("Diff range: `{}`\n\n", data.diff_range));

        let ordered = findings_in_display_order(data.findings);
        if ordered.is_empty() {
            md.push_str("No findings.\n\n");
        }

        let mut current_severity: Option<Severity> = None;
        for finding in ordered {
            if current_severity != Some(finding.severity) {
                current_severity = Some(finding.severity);
                md.push_str(&format!("## {} severity\n\n", heading(finding.severity)));
            }
            md.push_str(&Self::render_finding(finding, data.reconciliation));
        }

        md.push_str("---\n\n");
        let t = &data.reconciliation.tally;
        md.push_str(&format!(
            "**Summary:** resolved {} | partial {} | open {} | new high {}\n",
            t.resolved, t.partial, t.open, t.new_high
        ));

        if t.resolved > 0 {
            md.push_str(
                "\n> Resolved findings are no longer reported by the reviewer; \
                 this is assumed to mean fixed, but a missed re-detection is \
                 indistinguishable from a fix.\n",
            );
        }
        if data.dropped > 0 {
            md.push_str(&format!(
                "\n> {} findings dropped due to malformed data.\n",
                data.dropped
            ));
        }

        md
    }

    fn render_finding(finding: &Finding, reconciliation: &ReconciliationResult) -> String {
        let mut md = String::new();

        let marker = match finding.severity {
            Severity::High => "🔴",
            Severity::Medium => "🟡",
            Severity::Low => "🟢",
        };
        let status = match reconciliation.current.get(&finding.id) {
            Some(CurrentStatus::Matched { .. }) => "open since previous run",
            Some(CurrentStatus::New) | None => "new",
        };

        md.push_str(&format!(
            "### {} {} - `{}:{}`\n\n",
            marker, finding.title, finding.file, finding.line_start
        ));
        if finding.line_end > finding.line_start {
            md.push_str(&format!(
                "Lines {}-{}",
                finding.line_start, finding.line_end
            ));
        } else {
            md.push_str(&format!("Line {}", finding.line_start));
        }
        if let Some(symbol) = &finding.symbol {
            md.push_str(&format!(" in `{symbol}`"));
        }
        md.push_str(&format!(
            " · {} · {}\n\n",
            finding.category, status
        ));

        if !finding.explanation.is_empty() {
            md.push_str(&format!("{}\n\n", finding.explanation));
        }
        if !finding.suggestion.is_empty() {
            md.push_str(&format!("**Suggestion:** {}\n\n", finding.suggestion));
        }
        if let Some(patch) = &finding.patch {
            md.push_str("```diff\n");
            md.push_str(patch);
            if !patch.ends_with('\n') {
                md.push('\n');
            }
            md.push_str("```\n\n");
        }

        md
    }
}

fn heading(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "High",
        Severity::Medium => "Medium",
        Severity::Low => "Low",
    }
}
