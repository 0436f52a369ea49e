//! Review use-cases: severity policy, reconciliation, ordering, rendering,
//! and the run pipeline tying them together.

pub mod ordering;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod rules;
pub mod severity;
