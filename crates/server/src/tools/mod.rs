//! MCP tool implementations.
//!
//! Every query tool returns the same envelope: the module, the cache key,
//! what the cache did, and the structured answer.

pub mod anatomy;
pub mod cache;
pub mod dictionary;
pub mod disease_info;
pub mod drug_food;
pub mod drug_interaction;
pub mod exam_questions;
pub mod test_info;

use medkit_client::{DomainService, Prompted};
use medkit_core::cache::{CacheKey, CacheOutcome, FetchOptions};
use medkit_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;
use crate::services::Model;

/// Cache flags accepted by every query tool.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct CacheFlags {
    /// Skip the cache read and ask the model again.
    #[serde(default)]
    pub bypass_cache: bool,

    /// Ask the model again and replace the stored answer.
    #[serde(default)]
    pub overwrite: bool,
}

impl From<CacheFlags> for FetchOptions {
    fn from(flags: CacheFlags) -> Self {
        FetchOptions { bypass: flags.bypass_cache, overwrite: flags.overwrite }
    }
}

/// Output envelope shared by the query tools.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput<T> {
    pub module: &'static str,
    pub key: CacheKey,
    pub cache: CacheOutcome,
    pub result: T,
}

/// Answer `query` through `service` and wrap the result for the client.
pub async fn answer<Q>(
    service: &DomainService<Q, Model>, query: Q, flags: CacheFlags,
) -> Result<CallToolResult, McpError>
where
    Q: Prompted + 'static,
{
    let fetched = service.fetch(&query, flags.into()).await.map_err(ToolError::from)?;

    tracing::info!(module = Q::MODULE, key = %fetched.key, hit = fetched.outcome.is_hit(), "query answered");

    let output = ToolOutput { module: Q::MODULE, key: fetched.key, cache: fetched.outcome, result: fetched.value };
    to_result(&output)
}

/// Serialize a tool output as pretty JSON text content.
pub fn to_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
