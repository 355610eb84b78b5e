//! Application configuration with layered loading.
//!
//! Sources, highest precedence first:
//!
//! 1. Environment variables (MEDKIT_*, nested keys split on `__`)
//! 2. TOML config file (if MEDKIT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::registry;

mod validation;

pub use validation::ConfigError;

const MB: u64 = 1024 * 1024;

/// Cache settings for a single accessor.
///
/// Built once per module from [`AppConfig::cache_config`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub storage_path: PathBuf,
    pub capacity_bytes: u64,
    pub compression_threshold_bytes: usize,
    /// Regenerate and replace on every call.
    pub overwrite: bool,
    pub enabled: bool,
}

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API key.
    ///
    /// Set via MEDKIT_GEMINI_API_KEY. Required only when a generator runs.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether results are cached at all.
    ///
    /// Set via MEDKIT_DB_STORE.
    #[serde(default = "default_true")]
    pub db_store: bool,

    /// Directory holding one store per module.
    #[serde(default = "default_db_dir")]
    pub db_dir: PathBuf,

    /// Single store shared by every module. Overrides `db_dir`.
    ///
    /// Entries stay tagged with their module, so lookups, removals and
    /// counts never cross modules. The capacity ceiling applies to the
    /// whole file.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Capacity ceiling of each store in megabytes.
    #[serde(default = "default_db_capacity_mb")]
    pub db_capacity_mb: u64,

    /// Force regeneration on every call.
    #[serde(default)]
    pub db_overwrite: bool,

    /// Values larger than this are compressed before storage.
    #[serde(default = "default_compression_threshold")]
    pub compression_threshold_bytes: usize,

    /// Per-module model overrides, keyed by module name.
    ///
    /// Set via MEDKIT_MODELS__<MODULE>, e.g. MEDKIT_MODELS__DISEASE_INFO.
    #[serde(default)]
    pub models: BTreeMap<String, String>,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_true() -> bool {
    true
}

fn default_db_dir() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_db_capacity_mb() -> u64 {
    500
}

fn default_compression_threshold() -> usize {
    4096
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            timeout_ms: default_timeout_ms(),
            db_store: true,
            db_dir: default_db_dir(),
            db_path: None,
            db_capacity_mb: default_db_capacity_mb(),
            db_overwrite: false,
            compression_threshold_bytes: default_compression_threshold(),
            models: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed or
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MEDKIT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MEDKIT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Gemini API key is not set.
    pub fn require_gemini_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "gemini_api_key".into(),
                hint: "Set MEDKIT_GEMINI_API_KEY environment variable".into(),
            })
    }

    /// Model for `module`: the configured override, else the registry default.
    pub fn model_for(&self, module: &str) -> Option<String> {
        self.models
            .get(module)
            .cloned()
            .or_else(|| registry::lookup(module).map(|spec| spec.model.to_string()))
    }

    /// Cache settings for `module`.
    pub fn cache_config(&self, module: &str) -> CacheConfig {
        let storage_path = match &self.db_path {
            Some(path) => path.clone(),
            None => self.db_dir.join(format!("{module}.sqlite")),
        };

        CacheConfig {
            storage_path,
            capacity_bytes: self.db_capacity_mb.saturating_mul(MB),
            compression_threshold_bytes: self.compression_threshold_bytes,
            overwrite: self.db_overwrite,
            enabled: self.db_store,
        }
    }
}
