//! External reviewer collaborator (infrastructure).
//!
//! The reviewer is an untrusted oracle: it receives normalized hunks plus
//! the resolved ruleset and returns raw findings, which are validated and
//! split before the engine trusts any field.

pub mod adapter;
pub mod command;

pub use adapter::{RawFinding, validate_findings};
pub use command::CommandAgent;

use crate::domain::{FileDiff, ResolvedRule, ReviewError};
use async_trait::async_trait;

/// Capability interface for the external LLM reviewer.
#[async_trait]
pub trait ReviewAgent: Send + Sync {
    /// Stable identifier of the agent (for logs and run metadata).
    fn id(&self) -> &str;

    /// Produce raw findings for a normalized changeset.
    ///
    /// May suspend for a long-latency external call; this is the one
    /// legitimate suspension point in a review run. A timeout or hard
    /// failure is fatal to the run.
    async fn review(
        &self,
        files: &[FileDiff],
        rules: &[ResolvedRule],
    ) -> Result<Vec<RawFinding>, ReviewError>;
}
