//! CLI support (diff acquisition).

pub mod diff;
