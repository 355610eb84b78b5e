//! SQLite-backed content cache for generated answers.
//!
//! Each query module has its own domain, usually in a store file of its own.
//! Entries are scoped by domain, so modules may also share a file. Keys are
//! deterministic SHA-256 digests
//! of the normalized query, values are opaque bytes compressed above a size
//! threshold. The store has a hard capacity ceiling and never evicts: a full
//! store reports [`Error::StorageFull`] and the accessor carries on uncached.

pub mod accessor;
pub mod codec;
pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;

pub use crate::Error;

pub use accessor::{CacheOutcome, CachedAccessor, FetchError, FetchOptions, Fetched, Generator, StorageFault};
pub use connection::StorageHandle;
pub use entries::{PutOutcome, StoreStats};
pub use key::{CacheKey, CacheQuery, KeyBuilder, KeyError, derive_key};
