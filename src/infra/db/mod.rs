//! SQLite persistence (infrastructure).

pub mod database;
pub mod repository;

pub use database::Database;
pub use repository::ReviewRunRepository;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Shared connection handle used by repositories.
pub type DbConn = Arc<Mutex<Connection>>;
