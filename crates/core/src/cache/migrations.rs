//! Schema migrations for a cache store.
//!
//! Applied versions are recorded in `_migrations`. Pending versions run in
//! order inside a single transaction, so a store is never left half-migrated.

use super::Error;
use tokio_rusqlite::rusqlite::TransactionBehavior;
use tokio_rusqlite::{Connection, params};

/// Ordered (version, SQL batch) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_entries.sql"))];

/// Highest schema version this build knows about.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Bring the store up to [`latest_version`].
///
/// A store written by a newer build is refused rather than downgraded.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let applied: i64 = tx.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;
        if applied > latest_version() {
            return Err(Error::MigrationFailed(format!(
                "store is at schema version {applied}, this build supports up to {}",
                latest_version()
            )));
        }

        for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > applied) {
            tracing::debug!(version, "applying cache migration");
            tx.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
            tx.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
        }

        tx.commit()?;
        Ok(())
    })
    .await
    .map_err(Error::from)
}
