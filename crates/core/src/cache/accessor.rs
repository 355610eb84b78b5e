//! Read-through cache in front of an external generator.
//!
//! A [`CachedAccessor`] owns one store and one generator. Every call derives a
//! key, serves a hit from storage when allowed, otherwise calls the generator
//! and records the fresh value. Storage problems never fail a call: they are
//! logged and surfaced as [`CacheOutcome::Degraded`].

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::connection::StorageHandle;
use super::entries::PutOutcome;
use super::key::{CacheKey, CacheQuery, KeyError, derive_key};
use crate::Error;
use crate::config::CacheConfig;

/// Produces the value for a query on a cache miss.
#[async_trait]
pub trait Generator: Send + Sync {
    type Query: CacheQuery + Send + Sync;
    type Output: Serialize + DeserializeOwned + Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn generate(&self, query: &Self::Query) -> Result<Self::Output, Self::Error>;
}

/// Per-call flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache read. The fresh value is still stored if no entry exists.
    pub bypass: bool,
    /// Regenerate and replace any existing entry.
    pub overwrite: bool,
}

impl FetchOptions {
    pub fn bypass() -> Self {
        Self { bypass: true, overwrite: false }
    }

    pub fn overwrite() -> Self {
        Self { bypass: false, overwrite: true }
    }
}

/// Which part of the store misbehaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorageFault {
    Unavailable,
    Full,
    Read,
    Write,
}

/// What the cache did for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheOutcome {
    /// Served from storage; the generator was not called.
    Hit,
    /// Generated and written as a new entry.
    Stored,
    /// Generated and written over an existing entry.
    Replaced,
    /// Generated without reading; the existing entry was left in place.
    Retained,
    /// Caching is switched off for this accessor.
    Disabled,
    /// Generated, but the store could not be used.
    Degraded { fault: StorageFault, detail: String },
}

impl CacheOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheOutcome::Hit)
    }

    fn degraded(fault: StorageFault, err: &Error) -> Self {
        let fault = match err {
            Error::StorageFull => StorageFault::Full,
            Error::StorageUnavailable(_) => StorageFault::Unavailable,
            _ => fault,
        };
        CacheOutcome::Degraded { fault, detail: err.to_string() }
    }
}

/// A value together with how the cache produced it.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub key: CacheKey,
    pub outcome: CacheOutcome,
}

/// Errors surfaced by [`CachedAccessor::fetch`].
///
/// Storage failures never appear here.
#[derive(Debug, thiserror::Error)]
pub enum FetchError<E> {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Generator(E),
}

/// Read-through cache wrapper for one domain.
pub struct CachedAccessor<G: Generator> {
    domain: String,
    config: CacheConfig,
    storage: Option<StorageHandle>,
    open_error: Option<String>,
    generator: G,
}

impl<G: Generator> CachedAccessor<G> {
    /// Build an accessor, opening its store when caching is enabled.
    ///
    /// A store that cannot be opened disables caching for the lifetime of the
    /// accessor instead of failing construction.
    pub async fn open(domain: impl Into<String>, config: CacheConfig, generator: G) -> Self {
        let domain = domain.into();
        if !config.enabled {
            return Self { domain, config, storage: None, open_error: None, generator };
        }

        match StorageHandle::open(&config.storage_path, config.capacity_bytes, config.compression_threshold_bytes).await
        {
            Ok(storage) => {
                tracing::debug!(domain = %domain, path = %config.storage_path.display(), "cache store opened");
                Self { domain, config, storage: Some(storage), open_error: None, generator }
            }
            Err(e) => {
                tracing::error!(domain = %domain, error = %e, "cache store unavailable, caching disabled");
                Self { domain, config, storage: None, open_error: Some(e.to_string()), generator }
            }
        }
    }

    /// Build an accessor around an already opened store.
    pub fn with_storage(domain: impl Into<String>, config: CacheConfig, storage: StorageHandle, generator: G) -> Self {
        let storage = config.enabled.then_some(storage);
        Self { domain: domain.into(), config, storage, open_error: None, generator }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn storage(&self) -> Option<&StorageHandle> {
        self.storage.as_ref()
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn key_for(&self, query: &G::Query) -> Result<CacheKey, KeyError> {
        derive_key(&self.domain, query)
    }

    /// Return the value for `query`, generating and caching it when needed.
    pub async fn fetch(
        &self, query: &G::Query, options: FetchOptions,
    ) -> Result<Fetched<G::Output>, FetchError<G::Error>> {
        let key = self.key_for(query)?;
        let overwrite = options.overwrite || self.config.overwrite;

        let Some(storage) = self.storage.as_ref() else {
            let value = self.generator.generate(query).await.map_err(FetchError::Generator)?;
            let outcome = match &self.open_error {
                Some(detail) if self.config.enabled => {
                    CacheOutcome::Degraded { fault: StorageFault::Unavailable, detail: detail.clone() }
                }
                _ => CacheOutcome::Disabled,
            };
            return Ok(Fetched { value, key, outcome });
        };

        let mut fault = None;
        let mut replace = overwrite;

        if !options.bypass && !overwrite {
            match storage.get(&self.domain, key.as_str()).await {
                Ok(Some(bytes)) => match serde_json::from_slice::<G::Output>(&bytes) {
                    Ok(value) => {
                        tracing::debug!(domain = %self.domain, key = %key, "cache hit");
                        return Ok(Fetched { value, key, outcome: CacheOutcome::Hit });
                    }
                    Err(e) => {
                        tracing::warn!(domain = %self.domain, key = %key, error = %e, "cached value unreadable, regenerating");
                        replace = true;
                    }
                },
                Ok(None) => tracing::debug!(domain = %self.domain, key = %key, "cache miss"),
                Err(e) => {
                    tracing::warn!(domain = %self.domain, key = %key, error = %e, "cache read failed");
                    fault = Some(CacheOutcome::degraded(StorageFault::Read, &e));
                }
            }
        }

        let value = self.generator.generate(query).await.map_err(FetchError::Generator)?;

        let stored = match serde_json::to_vec(&value) {
            Ok(bytes) if replace => storage.put(&self.domain, key.as_str(), &bytes).await,
            Ok(bytes) => storage.put_if_absent(&self.domain, key.as_str(), &bytes).await,
            Err(e) => Err(Error::from(e)),
        };

        let outcome = match stored {
            Ok(PutOutcome::Inserted) => CacheOutcome::Stored,
            Ok(PutOutcome::Replaced) => CacheOutcome::Replaced,
            Ok(PutOutcome::Kept) => CacheOutcome::Retained,
            Err(e) => {
                tracing::warn!(domain = %self.domain, key = %key, error = %e, "cache write failed, returning uncached value");
                CacheOutcome::degraded(StorageFault::Write, &e)
            }
        };

        Ok(Fetched { value, key, outcome: fault.unwrap_or(outcome) })
    }

    /// Release the store. Dropping the accessor has the same effect.
    pub async fn close(self) -> Result<(), Error> {
        match self.storage {
            Some(storage) => storage.close().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::KeyBuilder;
    use serde::Deserialize;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MB: u64 = 1024 * 1024;

    #[derive(Debug)]
    struct Lookup {
        name: String,
        age: Option<u32>,
    }

    impl Lookup {
        fn new(name: &str) -> Self {
            Self { name: name.into(), age: None }
        }
    }

    impl CacheQuery for Lookup {
        fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
            key.require("name", &self.name)?.optional(self.age);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Answer {
        text: String,
        call: usize,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("upstream timed out")]
    struct UpstreamTimeout;

    #[derive(Clone, Default)]
    struct CountingGenerator {
        calls: Arc<AtomicUsize>,
        payload_len: usize,
        fail: bool,
    }

    impl CountingGenerator {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Generator for CountingGenerator {
        type Query = Lookup;
        type Output = Answer;
        type Error = UpstreamTimeout;

        async fn generate(&self, query: &Lookup) -> Result<Answer, UpstreamTimeout> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(UpstreamTimeout);
            }
            let text = if self.payload_len > 0 { noise_text(self.payload_len) } else { format!("about {}", query.name) };
            Ok(Answer { text, call })
        }
    }

    /// Text that zlib cannot shrink below three quarters of its size.
    fn noise_text(len: usize) -> String {
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let mut state = 0x1234_5678u32;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                ALPHABET[(state >> 26) as usize] as char
            })
            .collect()
    }

    fn config(capacity_bytes: u64) -> CacheConfig {
        CacheConfig {
            storage_path: PathBuf::from(":memory:"),
            capacity_bytes,
            compression_threshold_bytes: 100,
            overwrite: false,
            enabled: true,
        }
    }

    async fn accessor(domain: &str, generator: CountingGenerator) -> CachedAccessor<CountingGenerator> {
        let storage = StorageHandle::open_in_memory(MB, 100).await.unwrap();
        CachedAccessor::with_storage(domain, config(MB), storage, generator)
    }

    #[tokio::test]
    async fn test_second_fetch_is_a_hit() {
        let generator = CountingGenerator::default();
        let cache = accessor("disease_info", generator.clone()).await;
        let query = Lookup::new("hypertension");

        let first = cache.fetch(&query, FetchOptions::default()).await.unwrap();
        let second = cache.fetch(&query, FetchOptions::default()).await.unwrap();

        assert_eq!(first.outcome, CacheOutcome::Stored);
        assert_eq!(second.outcome, CacheOutcome::Hit);
        assert_eq!(serde_json::to_vec(&first.value).unwrap(), serde_json::to_vec(&second.value).unwrap());
        assert_eq!(first.key, second.key);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_normalized_queries_share_entry() {
        let generator = CountingGenerator::default();
        let cache = accessor("disease_info", generator.clone()).await;

        cache.fetch(&Lookup::new("Type 2 Diabetes"), FetchOptions::default()).await.unwrap();
        let hit = cache.fetch(&Lookup::new("  type 2   diabetes "), FetchOptions::default()).await.unwrap();

        assert!(hit.outcome.is_hit());
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_regenerates_and_replaces() {
        let generator = CountingGenerator::default();
        let cache = accessor("disease_info", generator.clone()).await;
        let query = Lookup::new("asthma");

        cache.fetch(&query, FetchOptions::default()).await.unwrap();
        let refreshed = cache.fetch(&query, FetchOptions::overwrite()).await.unwrap();
        assert_eq!(refreshed.outcome, CacheOutcome::Replaced);
        assert_eq!(refreshed.value.call, 2);

        let hit = cache.fetch(&query, FetchOptions::default()).await.unwrap();
        assert!(hit.outcome.is_hit());
        assert_eq!(hit.value.call, 2);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_config_overwrite_applies_to_every_call() {
        let generator = CountingGenerator::default();
        let storage = StorageHandle::open_in_memory(MB, 100).await.unwrap();
        let cache = CachedAccessor::with_storage(
            "disease_info",
            CacheConfig { overwrite: true, ..config(MB) },
            storage,
            generator.clone(),
        );
        let query = Lookup::new("asthma");

        assert_eq!(cache.fetch(&query, FetchOptions::default()).await.unwrap().outcome, CacheOutcome::Stored);
        assert_eq!(cache.fetch(&query, FetchOptions::default()).await.unwrap().outcome, CacheOutcome::Replaced);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_bypass_skips_read_and_keeps_entry() {
        let generator = CountingGenerator::default();
        let cache = accessor("disease_info", generator.clone()).await;
        let query = Lookup::new("gout");

        cache.fetch(&query, FetchOptions::default()).await.unwrap();
        let bypassed = cache.fetch(&query, FetchOptions::bypass()).await.unwrap();
        assert_eq!(bypassed.outcome, CacheOutcome::Retained);
        assert_eq!(bypassed.value.call, 2);

        let hit = cache.fetch(&query, FetchOptions::default()).await.unwrap();
        assert_eq!(hit.value.call, 1);
    }

    #[tokio::test]
    async fn test_bypass_on_empty_store_writes() {
        let generator = CountingGenerator::default();
        let cache = accessor("disease_info", generator.clone()).await;
        let query = Lookup::new("gout");

        let bypassed = cache.fetch(&query, FetchOptions::bypass()).await.unwrap();
        assert_eq!(bypassed.outcome, CacheOutcome::Stored);
        assert!(cache.fetch(&query, FetchOptions::default()).await.unwrap().outcome.is_hit());
    }

    #[tokio::test]
    async fn test_disabled_never_touches_storage() {
        let generator = CountingGenerator::default();
        let storage = StorageHandle::open_in_memory(MB, 100).await.unwrap();
        let untouched = storage.clone();
        let cache = CachedAccessor::with_storage(
            "disease_info",
            CacheConfig { enabled: false, ..config(MB) },
            storage,
            generator.clone(),
        );
        let query = Lookup::new("migraine");

        for _ in 0..3 {
            let fetched = cache.fetch(&query, FetchOptions::default()).await.unwrap();
            assert_eq!(fetched.outcome, CacheOutcome::Disabled);
        }
        assert_eq!(generator.calls(), 3);
        assert!(cache.storage().is_none());
        assert_eq!(untouched.stats("disease_info").await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_storage_full_returns_fresh_value() {
        let generator = CountingGenerator { payload_len: 2 * MB as usize, ..Default::default() };
        let cache = accessor("disease_info", generator.clone()).await;
        let query = Lookup::new("everything");

        let first = cache.fetch(&query, FetchOptions::default()).await.unwrap();
        assert_eq!(first.value.text.len(), 2 * MB as usize);
        assert!(matches!(first.outcome, CacheOutcome::Degraded { fault: StorageFault::Full, .. }));

        let second = cache.fetch(&query, FetchOptions::default()).await.unwrap();
        assert!(matches!(second.outcome, CacheOutcome::Degraded { fault: StorageFault::Full, .. }));
        assert_eq!(second.value.call, 2);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_domains_never_share_entries() {
        let generator = CountingGenerator::default();
        let storage = StorageHandle::open_in_memory(MB, 100).await.unwrap();
        let disease = CachedAccessor::with_storage("disease", config(MB), storage.clone(), generator.clone());
        let drug = CachedAccessor::with_storage("drug", config(MB), storage.clone(), generator.clone());
        let query = Lookup::new("aspirin");

        let a = disease.fetch(&query, FetchOptions::default()).await.unwrap();
        let b = drug.fetch(&query, FetchOptions::default()).await.unwrap();

        assert_ne!(a.key, b.key);
        assert_eq!(b.outcome, CacheOutcome::Stored);
        assert_eq!(generator.calls(), 2);
        assert_eq!(storage.stats("disease").await.unwrap().entries, 1);
        assert_eq!(storage.stats("drug").await.unwrap().entries, 1);
    }

    #[tokio::test]
    async fn test_generator_error_propagates_without_write() {
        let generator = CountingGenerator { fail: true, ..Default::default() };
        let cache = accessor("disease_info", generator.clone()).await;
        let query = Lookup::new("lupus");

        let err = cache.fetch(&query, FetchOptions::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Generator(UpstreamTimeout)));
        assert_eq!(err.to_string(), "upstream timed out");

        let stats = cache.storage().unwrap().stats(cache.domain()).await.unwrap();
        assert_eq!(stats.entries, 0);
    }

    #[tokio::test]
    async fn test_key_error_fails_before_generation() {
        let generator = CountingGenerator::default();
        let cache = accessor("disease_info", generator.clone()).await;

        let err = cache.fetch(&Lookup::new("   "), FetchOptions::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Key(KeyError::MissingField { field: "name" })));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_regenerated_and_replaced() {
        let generator = CountingGenerator::default();
        let cache = accessor("disease_info", generator.clone()).await;
        let query = Lookup::new("anemia");
        let key = cache.key_for(&query).unwrap();
        cache.storage().unwrap().put(cache.domain(), key.as_str(), b"{not json").await.unwrap();

        let fetched = cache.fetch(&query, FetchOptions::default()).await.unwrap();
        assert_eq!(fetched.outcome, CacheOutcome::Replaced);
        assert!(cache.fetch(&query, FetchOptions::default()).await.unwrap().outcome.is_hit());
    }

    #[tokio::test]
    async fn test_unavailable_store_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let generator = CountingGenerator::default();
        let cfg = CacheConfig { storage_path: blocker.join("store.sqlite"), ..config(MB) };
        let cache = CachedAccessor::open("disease_info", cfg, generator.clone()).await;

        let fetched = cache.fetch(&Lookup::new("flu"), FetchOptions::default()).await.unwrap();
        assert!(matches!(fetched.outcome, CacheOutcome::Degraded { fault: StorageFault::Unavailable, .. }));
        assert_eq!(fetched.value.call, 1);
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CacheConfig { storage_path: dir.path().join("disease_info.sqlite"), ..config(MB) };
        let query = Lookup { name: "Hepatitis B".into(), age: Some(40) };

        let generator = CountingGenerator::default();
        let cache = CachedAccessor::open("disease_info", cfg.clone(), generator.clone()).await;
        let first = cache.fetch(&query, FetchOptions::default()).await.unwrap();
        cache.close().await.unwrap();

        let restarted = CachedAccessor::open("disease_info", cfg, generator.clone()).await;
        let second = restarted.fetch(&query, FetchOptions::default()).await.unwrap();
        assert!(second.outcome.is_hit());
        assert_eq!(first.key, second.key);
        assert_eq!(first.value, second.value);
        assert_eq!(generator.calls(), 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(CacheOutcome::Degraded { fault: StorageFault::Full, detail: "x".into() })
            .unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["fault"], "full");
        assert_eq!(serde_json::to_value(CacheOutcome::Hit).unwrap()["status"], "hit");
    }
}
