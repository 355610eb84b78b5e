//! Unified error types for medkit.
//!
//! Storage failures are always recoverable by the accessor; these variants
//! exist so callers can tell which kind of degradation happened.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::cache::key::KeyError;

/// Unified error types for the medkit crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required identifying fields were missing when deriving a cache key.
    #[error("KEY_DERIVATION: {0}")]
    KeyDerivation(#[from] KeyError),

    /// No cache entry found for the given key.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// The backing store could not be opened (bad path, permissions, capacity).
    #[error("STORAGE_UNAVAILABLE: {0}")]
    StorageUnavailable(String),

    /// The capacity ceiling was reached while writing.
    #[error("STORAGE_FULL: capacity ceiling reached")]
    StorageFull,

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid key format.
    #[error("CACHE_ERROR: invalid key format")]
    InvalidKey,

    /// Compressed payload could not be encoded or decoded.
    #[error("CACHE_ERROR: codec failure: {0}")]
    Codec(String),

    /// Cached payload could not be (de)serialized.
    #[error("SERIALIZATION: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => Error::from(e),
            other => Error::Database(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        if err.sqlite_error_code() == Some(rusqlite::ErrorCode::DiskFull) {
            return Error::StorageFull;
        }
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::KeyDerivation(e) => (-32602, e.to_string()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::StorageUnavailable(msg) => (-32003, msg.clone()),
            Error::StorageFull => (-32004, "Cache store is full".to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::InvalidKey => (-32602, "Invalid key format".to_string()),
            Error::Codec(msg) => (-32002, msg.clone()),
            Error::Serialization(e) => (-32000, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
