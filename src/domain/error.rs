//! Domain error types for recheck.
//!
//! These errors represent domain-level failures that can occur during a
//! review run. Fatal variants abort the run before anything is persisted;
//! recoverable ones are accumulated and disclosed in the rendered report.

use thiserror::Error;

/// Errors raised while producing or reconciling a review run.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The input diff could not be parsed. Fatal; nothing is persisted.
    #[error("Malformed diff: {0}")]
    MalformedDiff(String),

    /// One collaborator finding failed structural validation. Recoverable;
    /// the finding is dropped and the drop is counted.
    #[error("Invalid finding from reviewer: {0}")]
    InvalidFinding(String),

    /// The external reviewer did not answer in time. Fatal; the prior run
    /// remains the latest committed state.
    #[error("Reviewer collaborator timed out after {0}s")]
    CollaboratorTimeout(u64),

    /// The external reviewer failed outright. Fatal.
    #[error("Reviewer collaborator failed: {0}")]
    CollaboratorFailed(String),

    /// Append-only history refused to overwrite an existing run.
    #[error("Review run already persisted: {0}")]
    DuplicateRun(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
