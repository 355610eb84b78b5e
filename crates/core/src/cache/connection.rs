//! Store handle management with pragma configuration.
//!
//! This module opens the SQLite file backing a cache, applies the pragmas
//! needed for concurrent readers (WAL mode), caps the file at the configured
//! capacity and runs migrations.

use super::migrations;
use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA busy_timeout=5000;";

/// Handle to one cache store.
///
/// Wraps a tokio-rusqlite Connection that runs database operations on a
/// background thread. Dropping the last clone releases the file.
#[derive(Clone, Debug)]
pub struct StorageHandle {
    pub(crate) conn: Connection,
    capacity_bytes: u64,
    compression_threshold: usize,
}

impl StorageHandle {
    /// Open or create the store at `path`.
    ///
    /// Missing parent directories are created. Every failure, including an
    /// existing file that is already larger than `capacity_bytes`, is
    /// reported as [`Error::StorageUnavailable`].
    pub async fn open(
        path: impl AsRef<Path>, capacity_bytes: u64, compression_threshold: usize,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::StorageUnavailable(format!("{}: {e}", parent.display())))?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| Error::StorageUnavailable(format!("{}: {e}", path.display())))?;

        Self::configure(conn, capacity_bytes, compression_threshold)
            .await
            .map_err(|e| match e {
                Error::StorageUnavailable(msg) => Error::StorageUnavailable(format!("{}: {msg}", path.display())),
                other => Error::StorageUnavailable(format!("{}: {other}", path.display())),
            })
    }

    /// Open an in-memory store for testing.
    ///
    /// Uses the same pragma, capacity and migration setup as file-based stores.
    pub async fn open_in_memory(capacity_bytes: u64, compression_threshold: usize) -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

        Self::configure(conn, capacity_bytes, compression_threshold).await
    }

    async fn configure(conn: Connection, capacity_bytes: u64, compression_threshold: usize) -> Result<Self, Error> {
        conn.call(move |conn| -> Result<(), Error> {
            conn.execute_batch(PRAGMAS)?;
            let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
            let max_pages = (capacity_bytes / page_size.max(1) as u64).max(1);
            // Clamped by SQLite to the current page count when the file is already larger.
            let applied: i64 = conn.query_row(&format!("PRAGMA max_page_count = {max_pages}"), [], |row| row.get(0))?;
            if applied as u64 > max_pages {
                return Err(Error::StorageUnavailable(format!(
                    "existing store uses {} bytes, capacity is {capacity_bytes}",
                    applied as u64 * page_size as u64
                )));
            }
            Ok(())
        })
        .await
        .map_err(Error::from)?;

        migrations::run(&conn).await?;

        Ok(Self { conn, capacity_bytes, compression_threshold })
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    pub fn compression_threshold(&self) -> usize {
        self.compression_threshold
    }

    /// Release the underlying connection.
    ///
    /// Other clones of this handle observe a closed connection afterwards.
    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await.map_err(Error::Database)
    }
}
