//! Core types and shared functionality for medkit.
//!
//! This crate provides:
//! - Content cache with a SQLite backend and deterministic keys
//! - Unified error types
//! - Configuration structures
//! - The module registry

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;

pub use cache::{CacheKey, CacheOutcome, CacheQuery, CachedAccessor, FetchOptions, Generator, StorageHandle};
pub use config::{AppConfig, CacheConfig};
pub use error::Error;
