//! Configuration validation rules.
//!
//! Checks applied to `AppConfig` values after they have been loaded from
//! environment, files, or defaults.

use crate::config::AppConfig;
use crate::registry;
use thiserror::Error;

/// Upper bound for a single store, in megabytes.
const MAX_CAPACITY_MB: u64 = 64 * 1024;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `db_capacity_mb` is 0 or exceeds 64GB
    /// - `timeout_ms` is less than 100ms or exceeds 10 minutes
    /// - `gemini_base_url` or `db_dir` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_capacity_mb == 0 {
            return Err(ConfigError::Invalid {
                field: "db_capacity_mb".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.db_capacity_mb > MAX_CAPACITY_MB {
            return Err(ConfigError::Invalid {
                field: "db_capacity_mb".into(),
                reason: format!("must not exceed {MAX_CAPACITY_MB}"),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 600_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 10 minutes (600000ms)".into(),
            });
        }

        if self.gemini_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "gemini_base_url".into(), reason: "must not be empty".into() });
        }

        if self.db_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_dir".into(), reason: "must not be empty".into() });
        }

        for module in self.models.keys() {
            if registry::lookup(module).is_none() {
                tracing::warn!(module = %module, "model override for unknown module is ignored");
            }
        }

        if self.db_path.is_some() {
            tracing::debug!("db_path is set; every module shares one store");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_capacity_zero() {
        let config = AppConfig { db_capacity_mb: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "db_capacity_mb"));
    }

    #[test]
    fn test_validate_capacity_exceeds_limit() {
        let config = AppConfig { db_capacity_mb: MAX_CAPACITY_MB + 1, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "db_capacity_mb"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let low = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(low.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let high = AppConfig { timeout_ms: 600_001, ..Default::default() };
        assert!(matches!(high.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_base_url() {
        let config = AppConfig { gemini_base_url: " ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "gemini_base_url"));
    }

    #[test]
    fn test_validate_empty_db_dir() {
        let config = AppConfig { db_dir: PathBuf::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "db_dir"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { db_capacity_mb: 1, timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { db_capacity_mb: MAX_CAPACITY_MB, timeout_ms: 600_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
