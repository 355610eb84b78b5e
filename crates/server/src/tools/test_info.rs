//! medical_test_info tool implementation.
//!
//! Describes a diagnostic test from preparation through interpretation.

use medkit_client::DomainService;
use medkit_client::domains::MedicalTestQuery;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{CacheFlags, answer};
use crate::error::ToolError;
use crate::services::Model;

/// Parameters for the medical_test_info tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MedicalTestParams {
    /// Test name, e.g. "complete blood count".
    pub test_name: String,

    #[serde(flatten)]
    pub cache: CacheFlags,
}

/// Implementation of the medical_test_info tool.
pub async fn medical_test_impl(
    service: &DomainService<MedicalTestQuery, Model>, params: MedicalTestParams,
) -> Result<CallToolResult, McpError> {
    let query = MedicalTestQuery::new(&params.test_name).map_err(ToolError::from)?;
    answer(service, query, params.cache).await
}
