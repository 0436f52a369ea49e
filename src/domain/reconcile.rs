use super::finding::FindingId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Status assigned to a finding from the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorStatus {
    /// No longer reported; assumed fixed.
    Resolved,
    /// Same issue re-detected, but its surroundings changed enough that the
    /// fix may be incomplete.
    Partial,
    /// Same issue re-detected in the same place; still open.
    NotResolved,
}

impl fmt::Display for PriorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved => write!(f, "resolved"),
            Self::Partial => write!(f, "partial"),
            Self::NotResolved => write!(f, "not_resolved"),
        }
    }
}

/// Status assigned to a finding from the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CurrentStatus {
    /// Same logical issue as one previous finding (1:1).
    Matched { previous_id: FindingId },
    /// Not present in the previous run.
    New,
}

impl CurrentStatus {
    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }
}

/// Summary counts for the closing tally of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationTally {
    /// Previous findings no longer reported.
    pub resolved: u32,
    /// Previous findings re-detected with drifted surroundings.
    pub partial: u32,
    /// Previous findings still open in place.
    pub open: u32,
    /// Current findings that are both new and high severity.
    pub new_high: u32,
}

/// Outcome of matching a current finding set against the previous run.
///
/// Every previous finding receives exactly one `PriorStatus`; every current
/// finding exactly one `CurrentStatus`. A matched current finding references
/// exactly one previous finding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub previous: HashMap<FindingId, PriorStatus>,
    pub current: HashMap<FindingId, CurrentStatus>,
    pub tally: ReconciliationTally,
}

impl ReconciliationResult {
    pub fn new_count(&self) -> u32 {
        self.current.values().filter(|s| s.is_new()).count() as u32
    }
}
