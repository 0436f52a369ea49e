//! Reconciliation of a current finding set against the previous run.
//!
//! Findings are matched by content fingerprint, then paired greedily by
//! line distance so duplicate detections never collapse many-to-one. A
//! paired previous finding stays open (or becomes partial when its
//! surroundings drifted); an unpaired previous finding is assumed resolved.
//! That assumption is disclosed to the reader, not silently applied: the
//! renderer emits a caveat whenever anything was resolved by disappearance.

use crate::domain::{
    CurrentStatus, Finding, PriorStatus, ReconciliationResult, ReconciliationTally, Severity,
};
use std::collections::{BTreeMap, HashSet};

/// Minimum fraction of the previous context window that must reappear
/// around the new location for a moved finding to count as the same open
/// issue rather than a partial fix.
pub const CONTEXT_MATCH_THRESHOLD: f64 = 0.5;

/// Reconcile current findings against the previous run's findings.
///
/// `previous` may be empty (first run): every current finding is New and
/// the resolved/partial/open tallies are zero. This is the defined base
/// case, not an error. Ambiguous matches are settled by the deterministic
/// line-distance tie-break; reconciliation never fails.
pub fn reconcile(previous: &[Finding], current: &[Finding]) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();

    // BTreeMap keeps fingerprint iteration deterministic.
    let mut prev_by_fp: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
    for f in previous {
        prev_by_fp.entry(f.fingerprint.as_str()).or_default().push(f);
    }
    let mut curr_by_fp: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
    for f in current {
        curr_by_fp.entry(f.fingerprint.as_str()).or_default().push(f);
    }

    for (fp, prev_group) in &prev_by_fp {
        match curr_by_fp.get(fp) {
            None => {
                // Disappeared: assumed fixed (disclosed via report caveat).
                for prev in prev_group {
                    result
                        .previous
                        .insert(prev.id.clone(), PriorStatus::Resolved);
                }
            }
            Some(curr_group) => {
                pair_group(prev_group, curr_group, &mut result);
            }
        }
    }

    // Fingerprints absent from the previous run, plus leftover duplicates,
    // are New; everything already matched keeps its status.
    for f in current {
        result
            .current
            .entry(f.id.clone())
            .or_insert(CurrentStatus::New);
    }

    result.tally = tally(&result, current);
    result
}

/// Pair one fingerprint group greedily by smallest line distance (1:1).
fn pair_group(prev_group: &[&Finding], curr_group: &[&Finding], result: &mut ReconciliationResult) {
    let mut candidates: Vec<(u32, u32, u32, usize, usize)> = Vec::new();
    for (pi, prev) in prev_group.iter().enumerate() {
        for (ci, curr) in curr_group.iter().enumerate() {
            candidates.push((
                prev.line_distance(curr),
                prev.line_start,
                curr.line_start,
                pi,
                ci,
            ));
        }
    }
    candidates.sort();

    let mut used_prev: HashSet<usize> = HashSet::new();
    let mut used_curr: HashSet<usize> = HashSet::new();

    for (_, _, _, pi, ci) in candidates {
        if used_prev.contains(&pi) || used_curr.contains(&ci) {
            continue;
        }
        used_prev.insert(pi);
        used_curr.insert(ci);

        let prev = prev_group[pi];
        let curr = curr_group[ci];

        let status = if prev.line_start == curr.line_start
            || context_overlap(&prev.context, &curr.context) >= CONTEXT_MATCH_THRESHOLD
        {
            // Same issue, same place: still open.
            PriorStatus::NotResolved
        } else {
            // Re-detected but the surroundings changed; the fix may be
            // incomplete.
            PriorStatus::Partial
        };
        result.previous.insert(prev.id.clone(), status);
        result.current.insert(
            curr.id.clone(),
            CurrentStatus::Matched {
                previous_id: prev.id.clone(),
            },
        );
    }

    // More previous than current with this fingerprint: the extras are gone.
    for (pi, prev) in prev_group.iter().enumerate() {
        if !used_prev.contains(&pi) {
            result
                .previous
                .insert(prev.id.clone(), PriorStatus::Resolved);
        }
    }
}

/// Fraction of the previous context window found in the current window.
///
/// An empty previous window carries no signal and counts as a full match;
/// the fingerprint already agreed.
fn context_overlap(previous: &[String], current: &[String]) -> f64 {
    if previous.is_empty() {
        return 1.0;
    }
    let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
    let hits = previous
        .iter()
        .filter(|line| current_set.contains(line.as_str()))
        .count();
    hits as f64 / previous.len() as f64
}

fn tally(result: &ReconciliationResult, current: &[Finding]) -> ReconciliationTally {
    let mut t = ReconciliationTally::default();
    for status in result.previous.values() {
        match status {
            PriorStatus::Resolved => t.resolved += 1,
            PriorStatus::Partial => t.partial += 1,
            PriorStatus::NotResolved => t.open += 1,
        }
    }
    for f in current {
        if f.severity == Severity::High
            && result.current.get(&f.id).is_some_and(CurrentStatus::is_new)
        {
            t.new_high += 1;
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn finding(id: &str, title: &str, file: &str, line: u32, severity: Severity) -> Finding {
        let fingerprint = Finding::fingerprint_of(Category::Correctness, title, file, None);
        Finding {
            id: id.to_string(),
            category: Category::Correctness,
            severity,
            title: title.to_string(),
            file: file.to_string(),
            line_start: line,
            line_end: line,
            symbol: None,
            explanation: String::new(),
            suggestion: String::new(),
            patch: None,
            context: Vec::new(),
            fingerprint,
        }
    }

    fn with_context(mut f: Finding, context: &[&str]) -> Finding {
        f.context = context.iter().map(|s| s.to_string()).collect();
        f
    }

    #[test]
    fn first_run_marks_everything_new() {
        let current = vec![
            finding("c1", "Issue A", "a.rs", 10, Severity::High),
            finding("c2", "Issue B", "b.rs", 5, Severity::Low),
        ];
        let result = reconcile(&[], &current);

        assert!(result.previous.is_empty());
        assert_eq!(result.new_count(), 2);
        assert_eq!(result.tally.resolved, 0);
        assert_eq!(result.tally.partial, 0);
        assert_eq!(result.tally.open, 0);
        assert_eq!(result.tally.new_high, 1);
    }

    #[test]
    fn disappeared_finding_is_resolved() {
        let previous = vec![finding("p1", "Issue A", "Order.cs", 10, Severity::High)];
        let result = reconcile(&previous, &[]);

        assert_eq!(result.previous["p1"], PriorStatus::Resolved);
        assert_eq!(result.tally.resolved, 1);
        assert_eq!(result.new_count(), 0);
    }

    #[test]
    fn same_place_redetection_stays_open() {
        let previous = vec![finding("p1", "Issue A", "a.rs", 10, Severity::High)];
        let current = vec![finding("c1", "Issue A", "a.rs", 10, Severity::High)];
        let result = reconcile(&previous, &current);

        assert_eq!(result.previous["p1"], PriorStatus::NotResolved);
        assert_eq!(
            result.current["c1"],
            CurrentStatus::Matched {
                previous_id: "p1".to_string()
            }
        );
        assert_eq!(result.tally.open, 1);
        assert_eq!(result.tally.new_high, 0);
    }

    #[test]
    fn self_reconciliation_is_all_matched() {
        let set = vec![
            finding("f1", "Issue A", "a.rs", 10, Severity::High),
            finding("f2", "Issue B", "b.rs", 20, Severity::Medium),
        ];
        let result = reconcile(&set, &set);

        assert_eq!(result.new_count(), 0);
        assert_eq!(result.tally.resolved, 0);
        assert_eq!(result.tally.partial, 0);
        assert!(result.current.values().all(|s| !s.is_new()));
    }

    #[test]
    fn moved_finding_with_shared_context_stays_open() {
        let ctx = ["fn submit(order: Order) {", "validate(&order)?;", "}"];
        let previous = vec![with_context(
            finding("p1", "Missing auth check", "a.rs", 10, Severity::High),
            &ctx,
        )];
        let current = vec![with_context(
            finding("c1", "Missing auth check", "a.rs", 42, Severity::High),
            &ctx,
        )];
        let result = reconcile(&previous, &current);

        assert_eq!(result.previous["p1"], PriorStatus::NotResolved);
        assert_eq!(result.new_count(), 0);
    }

    #[test]
    fn moved_finding_with_drifted_context_is_partial() {
        let previous = vec![with_context(
            finding("p1", "Missing auth check", "a.rs", 10, Severity::High),
            &["let user = ctx.user();", "process(user);", "save(user);"],
        )];
        let current = vec![with_context(
            finding("c1", "Missing auth check", "a.rs", 42, Severity::High),
            &["let account = ctx.account();", "audit(account);", "save(user);"],
        )];
        let result = reconcile(&previous, &current);

        assert_eq!(result.previous["p1"], PriorStatus::Partial);
        assert_eq!(result.tally.partial, 1);
        // The matched current finding is tracked, not counted as new.
        assert_eq!(result.new_count(), 0);
    }

    #[test]
    fn duplicate_detections_tie_break_by_line_distance() {
        let previous = vec![finding("p1", "Issue A", "a.rs", 100, Severity::Medium)];
        let current = vec![
            finding("c_far", "Issue A", "a.rs", 10, Severity::Medium),
            finding("c_near", "Issue A", "a.rs", 98, Severity::Medium),
        ];
        let result = reconcile(&previous, &current);

        assert_eq!(
            result.current["c_near"],
            CurrentStatus::Matched {
                previous_id: "p1".to_string()
            }
        );
        assert_eq!(result.current["c_far"], CurrentStatus::New);
        assert_eq!(result.new_count(), 1);
    }

    #[test]
    fn extra_previous_duplicates_resolve() {
        let previous = vec![
            finding("p1", "Issue A", "a.rs", 10, Severity::Low),
            finding("p2", "Issue A", "a.rs", 50, Severity::Low),
        ];
        let current = vec![finding("c1", "Issue A", "a.rs", 12, Severity::Low)];
        let result = reconcile(&previous, &current);

        assert_eq!(result.previous["p1"], PriorStatus::NotResolved);
        assert_eq!(result.previous["p2"], PriorStatus::Resolved);
    }

    #[test]
    fn every_finding_gets_exactly_one_status() {
        let previous = vec![
            finding("p1", "Issue A", "a.rs", 10, Severity::High),
            finding("p2", "Issue B", "b.rs", 20, Severity::Low),
            finding("p3", "Issue C", "c.rs", 30, Severity::Medium),
        ];
        let current = vec![
            finding("c1", "Issue A", "a.rs", 11, Severity::High),
            finding("c2", "Issue D", "d.rs", 5, Severity::High),
        ];
        let result = reconcile(&previous, &current);

        assert_eq!(result.previous.len(), 3);
        assert_eq!(result.current.len(), 2);
        let matched_targets: Vec<_> = result
            .current
            .values()
            .filter_map(|s| match s {
                CurrentStatus::Matched { previous_id } => Some(previous_id.clone()),
                CurrentStatus::New => None,
            })
            .collect();
        // 1:1, never many-to-one.
        let unique: HashSet<_> = matched_targets.iter().collect();
        assert_eq!(unique.len(), matched_targets.len());
    }
}
