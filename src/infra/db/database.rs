//! SQLite database setup and connection management for recheck.
//! Handles database initialization, schema creation, and connection management.

use super::DbConn;
use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Database wrapper that manages the SQLite connection.
pub struct Database {
    conn: DbConn,
}

impl Database {
    /// Create or open the database at the default location.
    pub fn open() -> Result<Self> {
        let path = Self::default_path();
        Self::open_at(path)
    }

    /// Create an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Create or open the database at a specific path.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Get the default database path.
    fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("RECHECK_DB_PATH") {
            return PathBuf::from(path);
        }

        #[cfg(target_os = "macos")]
        {
            if let Some(home) = home::home_dir() {
                return home
                    .join("Library")
                    .join("Application Support")
                    .join("recheck")
                    .join("db.sqlite");
            }
        }

        #[cfg(target_os = "windows")]
        {
            if let Some(appdata) = std::env::var_os("APPDATA") {
                return PathBuf::from(appdata).join("recheck").join("db.sqlite");
            }
        }

        #[cfg(target_os = "linux")]
        {
            if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
                return PathBuf::from(xdg).join("recheck").join("db.sqlite");
            }
            if let Some(home) = home::home_dir() {
                return home
                    .join(".local")
                    .join("share")
                    .join("recheck")
                    .join("db.sqlite");
            }
        }

        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".recheck")
            .join("db.sqlite")
    }

    /// Initialize database schema.
    fn init(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        const SCHEMA_VERSION: i32 = 2;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let existing_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if existing_version < SCHEMA_VERSION {
            if existing_version == 0 {
                Self::create_schema(&conn)?;
            } else {
                Self::migrate(&conn, existing_version)?;
            }
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    fn migrate(conn: &Connection, from_version: i32) -> Result<()> {
        if from_version < 2 {
            conn.execute_batch(
                "ALTER TABLE review_runs ADD COLUMN dropped INTEGER NOT NULL DEFAULT 0;",
            )?;
        }
        Ok(())
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS review_runs (
                id TEXT PRIMARY KEY,
                pr_id TEXT NOT NULL,
                diff_range TEXT NOT NULL,
                diff_hash TEXT NOT NULL,
                dropped INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_review_runs_pr
                ON review_runs (pr_id, created_at);

            CREATE TABLE IF NOT EXISTS findings (
                id TEXT PRIMARY KEY,
                run_id TEXT NOT NULL REFERENCES review_runs(id),
                ordinal INTEGER NOT NULL,
                fingerprint TEXT NOT NULL,
                category TEXT NOT NULL,
                severity TEXT NOT NULL,
                title TEXT NOT NULL,
                file TEXT NOT NULL,
                line_start INTEGER NOT NULL,
                line_end INTEGER NOT NULL,
                symbol TEXT,
                explanation TEXT NOT NULL,
                suggestion TEXT NOT NULL,
                patch TEXT,
                context_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_findings_run
                ON findings (run_id, ordinal);
            "#,
        )?;
        Ok(())
    }

    /// Get a reference to the connection.
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    pub fn run_repo(&self) -> super::repository::ReviewRunRepository {
        super::repository::ReviewRunRepository::new(self.connection())
    }
}
