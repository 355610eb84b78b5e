//! Entry reads and writes.
//!
//! Every entry belongs to a domain. Several domains may share one store
//! file, so each operation here is scoped to the domain it is given.
//! Values are opaque bytes. Compression is applied here, on the caller's
//! thread, before the write is handed to the database thread.

use super::codec::{self, Codec};
use super::connection::StorageHandle;
use crate::Error;
use serde::Serialize;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{OptionalExtension, TransactionBehavior};

/// What a write did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// No entry existed; the value was written.
    Inserted,
    /// An entry existed and was replaced.
    Replaced,
    /// An entry existed and was left untouched.
    Kept,
}

/// Occupancy figures for one domain of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct StoreStats {
    pub entries: u64,
    pub compressed_entries: u64,
    /// Size of the main database file, shared by every domain in it.
    ///
    /// Pages still sitting in the write-ahead log are not counted and are not
    /// bounded by the capacity ceiling, so the on-disk total can briefly
    /// exceed `capacity_bytes` until the next checkpoint.
    pub used_bytes: u64,
    pub capacity_bytes: u64,
}

impl StorageHandle {
    /// Look up a value by key within `domain`.
    ///
    /// Returns `None` if the key does not exist.
    pub async fn get(&self, domain: &str, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let (domain, key) = (domain.to_string(), key.to_string());
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(Vec<u8>, i64)>, Error> {
                let row = conn
                    .query_row(
                        "SELECT value, codec FROM entries WHERE domain = ?1 AND key = ?2",
                        params![domain, key],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(Error::from)?;

        match row {
            Some((stored, marker)) => Ok(Some(codec::decode(Codec::from_i64(marker)?, stored)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a value.
    ///
    /// The write is a single transaction: readers see the old value or the
    /// new one, never a partial write. A full store yields
    /// [`Error::StorageFull`] and leaves the previous value intact.
    pub async fn put(&self, domain: &str, key: &str, value: &[u8]) -> Result<PutOutcome, Error> {
        self.write(domain, key, value, true).await
    }

    /// Insert a value only when the key is not already present in `domain`.
    pub async fn put_if_absent(&self, domain: &str, key: &str, value: &[u8]) -> Result<PutOutcome, Error> {
        self.write(domain, key, value, false).await
    }

    async fn write(&self, domain: &str, key: &str, value: &[u8], replace: bool) -> Result<PutOutcome, Error> {
        let (codec, stored) = codec::encode(value, self.compression_threshold())?;
        let (domain, key) = (domain.to_string(), key.to_string());
        let stored_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<PutOutcome, Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let existed: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM entries WHERE domain = ?1 AND key = ?2)",
                    params![domain, key],
                    |row| row.get(0),
                )?;

                if existed && !replace {
                    return Ok(PutOutcome::Kept);
                }

                tx.execute(
                    "INSERT INTO entries (domain, key, value, codec, stored_at) VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(domain, key) DO UPDATE SET
                        value = excluded.value,
                        codec = excluded.codec,
                        stored_at = excluded.stored_at",
                    params![domain, key, stored, codec as i64, stored_at],
                )?;
                tx.commit()?;

                Ok(if existed { PutOutcome::Replaced } else { PutOutcome::Inserted })
            })
            .await
            .map_err(Error::from)
    }

    /// Remove a single entry of `domain`.
    ///
    /// Returns whether an entry was deleted.
    pub async fn remove(&self, domain: &str, key: &str) -> Result<bool, Error> {
        let (domain, key) = (domain.to_string(), key.to_string());
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM entries WHERE domain = ?1 AND key = ?2", params![domain, key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Report the entry counts of `domain` and page usage against the capacity ceiling.
    pub async fn stats(&self, domain: &str) -> Result<StoreStats, Error> {
        let capacity_bytes = self.capacity_bytes();
        let domain = domain.to_string();
        self.conn
            .call(move |conn| -> Result<StoreStats, Error> {
                let (entries, compressed): (i64, i64) = conn.query_row(
                    "SELECT COUNT(*), COALESCE(SUM(codec != ?1), 0) FROM entries WHERE domain = ?2",
                    params![Codec::Raw as i64, domain],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
                let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

                Ok(StoreStats {
                    entries: entries as u64,
                    compressed_entries: compressed as u64,
                    used_bytes: (page_count * page_size) as u64,
                    capacity_bytes,
                })
            })
            .await
            .map_err(Error::from)
    }
}
