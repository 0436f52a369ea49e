//! Repository structs wrapping SQLite access per aggregate.

pub mod review_run;

pub use review_run::ReviewRunRepository;
