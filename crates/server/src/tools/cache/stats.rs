//! cache_stats tool implementation.

use medkit_core::cache::StoreStats;
use medkit_core::registry;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::Services;
use crate::tools::to_result;

/// Parameters for the cache_stats tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatsParams {
    /// Limit the report to one module. All modules when omitted.
    #[serde(default)]
    pub module: Option<String>,
}

/// Occupancy of one module's store.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ModuleStats {
    pub module: String,
    /// Whether caching is switched on for the module.
    pub enabled: bool,
    /// False when caching is off or the store could not be opened.
    pub cached: bool,
    /// Configured ceiling, reported even when the store is not open.
    pub capacity_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StoreStats>,
}

/// Output from the cache_stats tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CacheStatsOutput {
    pub modules: Vec<ModuleStats>,
}

/// Implementation of the cache_stats tool.
pub async fn stats_impl(services: &Services, params: CacheStatsParams) -> Result<CallToolResult, McpError> {
    let names: Vec<String> = match params.module {
        Some(module) => vec![module],
        None => registry::names().map(str::to_string).collect(),
    };

    let mut modules = Vec::with_capacity(names.len());
    for module in names {
        let cache = services.module(&module)?;
        let stats = match cache.storage {
            Some(storage) => Some(storage.stats(cache.domain).await?),
            None => None,
        };
        modules.push(ModuleStats {
            enabled: cache.config.enabled,
            cached: stats.is_some(),
            capacity_bytes: cache.config.capacity_bytes,
            module,
            stats,
        });
    }

    to_result(&CacheStatsOutput { modules })
}
