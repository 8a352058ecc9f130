use rusqlite::{Connection, Result};
use std::sync::Mutex;

use crate::db::migration_runner::MigrationRunner;

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::init(conn)
    }

    /// In-memory database for tests and dry runs. WAL does not apply here.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        let runner = MigrationRunner::new();

        log::info!("=== Starting database migration check ===");

        let current_version = runner.get_current_version(&conn)?;
        log::info!("Current schema version: {:?}", current_version);

        let applied = runner.run_pending_migrations(&conn)?;
        if applied > 0 {
            log::info!("Applied {} migrations successfully", applied);
        } else {
            log::info!("Database schema is up to date");
        }

        // Verify migration integrity (checksums)
        runner.verify_migrations(&conn)?;

        if let Some(version) = runner.get_current_version(&conn)? {
            log::info!("Final schema version: {}", version);
        }

        log::info!("=== Migration check complete ===");

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let path = path.to_str().unwrap();

        let db = Database::new(path).unwrap();
        drop(db);
        // Second open re-runs the migration check against an up-to-date schema.
        let db = Database::new(path).unwrap();
        let conn = db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
