use super::finding::Finding;
use serde::{Deserialize, Serialize};

/// Identifier of the pull request a review belongs to.
pub type PrId = String;

/// Unique identifier for a review run.
pub type ReviewRunId = String;

/// The immutable record of one review pass over a PR.
///
/// Runs are append-only: once persisted they are never edited, and the
/// latest run per PR is the baseline for the next reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRun {
    /// Unique identifier for the run.
    pub id: ReviewRunId,
    /// PR this run reviewed.
    pub pr_id: PrId,
    /// Revision range the diff covered (e.g. `main..feature` or a label).
    pub diff_range: String,
    /// Hash of the diff text for change checks.
    pub diff_hash: String,
    /// Findings produced by this run, in report order.
    pub findings: Vec<Finding>,
    /// Reviewer findings dropped during validation, disclosed in the report.
    #[serde(default)]
    pub dropped: u32,
    /// Creation timestamp in RFC3339 format.
    pub created_at: String,
}

impl ReviewRun {
    pub fn new(pr_id: impl Into<PrId>, diff_range: impl Into<String>, diff_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pr_id: pr_id.into(),
            diff_range: diff_range.into(),
            diff_hash,
            findings: Vec::new(),
            dropped: 0,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
