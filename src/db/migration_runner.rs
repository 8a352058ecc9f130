use rusqlite::{Connection, OptionalExtension, Result, params};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

impl Migration {
    pub fn new(version: u32, name: &'static str, sql: &'static str) -> Self {
        Self { version, name, sql }
    }

    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sql.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

pub struct MigrationRunner {
    migrations: Vec<Migration>,
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationRunner {
    pub fn new() -> Self {
        Self {
            migrations: Self::collect_migrations(),
        }
    }

    fn collect_migrations() -> Vec<Migration> {
        vec![
            Migration::new(0, "bootstrap", include_str!("migrations/000_bootstrap.sql")),
            Migration::new(1, "accounts", include_str!("migrations/001_accounts.sql")),
        ]
    }

    pub fn run_pending_migrations(&self, conn: &Connection) -> Result<usize> {
        if !self.has_schema_migrations_table(conn)? {
            log::info!("Fresh database detected, bootstrapping migration system");
        }

        let current_version = self.get_current_version(conn)?;

        let pending: Vec<&Migration> = self
            .migrations
            .iter()
            .filter(|m| match current_version {
                Some(v) => m.version > v,
                None => true,
            })
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        log::info!("Found {} pending migrations", pending.len());

        let mut applied = 0;
        for migration in pending {
            match self.apply_migration(conn, migration) {
                Ok(_) => {
                    applied += 1;
                    log::info!("Applied migration {}: {}", migration.version, migration.name);
                }
                Err(e) => {
                    log::error!("Migration {} failed: {}", migration.version, e);
                    log::error!("Migration stopped. Database rolled back to before this migration.");
                    return Err(e);
                }
            }
        }

        Ok(applied)
    }

    fn apply_migration(&self, conn: &Connection, migration: &Migration) -> Result<()> {
        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, checksum, applied_at)
             VALUES (?, ?, ?, ?)",
            params![
                migration.version,
                migration.name,
                migration.checksum(),
                current_timestamp()
            ],
        )?;

        tx.commit()
    }

    /// Compare stored checksums against the embedded migration sources.
    /// A mismatch means a migration file was edited after being applied.
    pub fn verify_migrations(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(
            "SELECT version, name, checksum FROM schema_migrations ORDER BY version",
        )?;

        let applied: Vec<(u32, String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>>>()?;

        for (version, name, stored_checksum) in applied {
            if let Some(migration) = self.migrations.iter().find(|m| m.version == version) {
                if stored_checksum != migration.checksum() {
                    log::error!("Checksum mismatch for migration {} ({})", version, name);
                    log::error!("The migration source was modified after it was applied.");
                    return Err(rusqlite::Error::InvalidQuery);
                }
            }
        }

        Ok(())
    }

    pub fn get_current_version(&self, conn: &Connection) -> Result<Option<u32>> {
        if !self.has_schema_migrations_table(conn)? {
            return Ok(None);
        }

        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .optional()?
            .flatten();

        Ok(version)
    }

    fn has_schema_migrations_table(&self, conn: &Connection) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
