//! Review run orchestration.
//!
//! One synchronous pipeline per run: normalize the diff, call the reviewer
//! collaborator (the single await point), apply the severity policy,
//! reconcile against the persisted previous run, render, persist. Fatal
//! errors abort before anything is written; the prior run stays the latest
//! committed state. Concurrent runs for the same PR are serialized by a
//! lock keyed on PR id.

use super::ordering::findings_in_display_order;
use super::reconcile::reconcile;
use super::report::{ReportData, ReportRenderer};
use super::rules::resolve_rules;
use super::severity::apply_severity_policy_all;
use crate::domain::{ReconciliationResult, ReviewError, ReviewRule, ReviewRun};
use crate::infra::agent::{ReviewAgent, validate_findings};
use crate::infra::db::ReviewRunRepository;
use crate::infra::diff::parser::changed_paths;
use crate::infra::diff::parse_diff;
use crate::infra::hash::diff_hash;
use anyhow::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-PR run locks. Runs for different PRs share no mutable state and may
/// proceed in parallel; runs against the same PR take turns.
static PR_LOCKS: Lazy<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn pr_lock(pr_id: &str) -> Arc<tokio::sync::Mutex<()>> {
    let mut locks = PR_LOCKS.lock().unwrap();
    locks.entry(pr_id.to_string()).or_default().clone()
}

/// Everything a completed run produces.
#[derive(Debug)]
pub struct RunOutcome {
    pub run: ReviewRun,
    pub reconciliation: ReconciliationResult,
    pub report: String,
    pub dropped: u32,
}

/// Execute one review run for a PR and persist it.
pub async fn execute_run(
    repo: &ReviewRunRepository,
    agent: &dyn ReviewAgent,
    rules: &[ReviewRule],
    pr_id: &str,
    diff_range: &str,
    diff_text: &str,
) -> Result<RunOutcome> {
    // Normalize before taking the lock; a malformed diff never touches state.
    let files = parse_diff(diff_text)?;
    let paths = changed_paths(&files);
    let resolved_rules = resolve_rules(rules, Some(pr_id), &paths);

    let lock = pr_lock(pr_id);
    let _guard = lock.lock().await;

    log::info!(
        "Reviewing {pr_id} ({} files) with agent {}",
        files.len(),
        agent.id()
    );
    let raw = agent.review(&files, &resolved_rules).await?;

    let (validated, dropped) = validate_findings(raw, &files);
    if dropped > 0 {
        log::warn!("{dropped} reviewer findings dropped during validation");
    }
    let current = apply_severity_policy_all(validated);

    let previous = repo.latest(pr_id)?;
    let previous_findings = previous.as_ref().map(|r| r.findings.as_slice()).unwrap_or(&[]);
    let reconciliation = reconcile(previous_findings, &current);

    let ordered: Vec<_> = findings_in_display_order(&current)
        .into_iter()
        .cloned()
        .collect();

    let mut run = ReviewRun::new(pr_id, diff_range, diff_hash(diff_text));
    run.findings = ordered;
    run.dropped = dropped;

    let report = ReportRenderer::render(&ReportData {
        findings: &run.findings,
        reconciliation: &reconciliation,
        dropped,
        pr_id,
        diff_range,
    });

    // Persist only after the report rendered; everything before this point
    // leaves the store untouched.
    repo.save(&run)?;

    Ok(RunOutcome {
        run,
        reconciliation,
        report,
        dropped,
    })
}

/// Re-render the report for the latest persisted run of a PR.
pub fn render_persisted(repo: &ReviewRunRepository, pr_id: &str) -> Result<String> {
    let runs = repo.list(&pr_id.to_string())?;
    let Some(latest) = runs.first() else {
        return Err(ReviewError::NotFound(format!("no runs for {pr_id}")).into());
    };
    let latest_findings = repo.findings(&latest.id)?;

    let previous_findings = match runs.get(1) {
        Some(prev) => repo.findings(&prev.id)?,
        None => Vec::new(),
    };
    let reconciliation = reconcile(&previous_findings, &latest_findings);

    Ok(ReportRenderer::render(&ReportData {
        findings: &latest_findings,
        reconciliation: &reconciliation,
        dropped: latest.dropped,
        pr_id,
        diff_range: &latest.diff_range,
    }))
}
