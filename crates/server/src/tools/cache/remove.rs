//! cache_remove tool implementation.
//!
//! Deletes one cached answer so the next query regenerates it. Stores never
//! evict on their own.

use medkit_core::cache::CacheKey;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::Services;
use crate::tools::to_result;

/// Parameters for the cache_remove tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheRemoveParams {
    pub module: String,
    pub key: String,
}

/// Output from the cache_remove tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheRemoveOutput {
    /// Whether an entry existed and was deleted.
    pub removed: bool,
}

/// Implementation of the cache_remove tool.
pub async fn remove_impl(services: &Services, params: CacheRemoveParams) -> Result<CallToolResult, McpError> {
    let key = CacheKey::parse(&params.key)?;
    let cache = services.module(&params.module)?;

    let removed = cache.require_storage()?.remove(cache.domain, key.as_str()).await?;
    tracing::info!(module = %params.module, key = %key, removed, "cache entry removed");

    to_result(&CacheRemoveOutput { removed })
}
