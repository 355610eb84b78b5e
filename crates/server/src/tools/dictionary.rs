//! medical_term tool implementation.
//!
//! Looks up a medical term in dictionary form.

use medkit_client::DomainService;
use medkit_client::domains::DictionaryQuery;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{CacheFlags, answer};
use crate::error::ToolError;
use crate::services::Model;

/// Parameters for the medical_term tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MedicalTermParams {
    /// The term to define, e.g. "tachycardia".
    pub term: String,

    #[serde(flatten)]
    pub cache: CacheFlags,
}

/// Implementation of the medical_term tool.
pub async fn medical_term_impl(
    service: &DomainService<DictionaryQuery, Model>, params: MedicalTermParams,
) -> Result<CallToolResult, McpError> {
    let query = DictionaryQuery::new(&params.term).map_err(ToolError::from)?;
    answer(service, query, params.cache).await
}
