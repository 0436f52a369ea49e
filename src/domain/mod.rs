//! Domain types for recheck.
//! Defines the core records and business objects used throughout the engine.

pub mod error;
pub mod finding;
pub mod hunk;
pub mod reconcile;
pub mod review;
pub mod rule;

pub use error::*;
pub use finding::*;
pub use hunk::*;
pub use reconcile::*;
pub use review::*;
pub use rule::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_severity_display_parse() {
        assert_eq!(Severity::Low.to_string(), "low");
        assert_eq!(Severity::from_str("HIGH").unwrap(), Severity::High);
        assert_eq!(Severity::from_str("critical").unwrap(), Severity::High);
        assert!(Severity::from_str("invalid").is_err());
    }

    #[test]
    fn test_category_display_parse() {
        assert_eq!(Category::Maintainability.to_string(), "maintainability");
        assert_eq!(Category::from_str("perf").unwrap(), Category::Performance);
        assert!(Category::from_str("vibes").is_err());
    }

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::High.rank() > Severity::Medium.rank());
        assert!(Severity::Medium.rank() > Severity::Low.rank());
    }
}
