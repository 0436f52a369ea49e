//! Unified diff parsing (infrastructure).

pub mod parser;

pub use parser::parse_diff;
