//! Application layer (use-cases, policies).
//!
//! This module orchestrates domain logic and defines app-specific policies
//! without depending on presentation or storage details.

pub mod review;
