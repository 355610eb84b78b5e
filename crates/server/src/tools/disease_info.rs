//! disease_info tool implementation.
//!
//! Produces a structured clinical overview of a disease.

use medkit_client::DomainService;
use medkit_client::domains::DiseaseQuery;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{CacheFlags, answer};
use crate::error::ToolError;
use crate::services::Model;

/// Parameters for the disease_info tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiseaseInfoParams {
    /// Disease name, e.g. "type 2 diabetes".
    pub disease: String,

    /// Clinical speciality to write for. Defaults to Internal Medicine.
    #[serde(default)]
    pub speciality: Option<String>,

    #[serde(flatten)]
    pub cache: CacheFlags,
}

/// Implementation of the disease_info tool.
pub async fn disease_info_impl(
    service: &DomainService<DiseaseQuery, Model>, params: DiseaseInfoParams,
) -> Result<CallToolResult, McpError> {
    let query = DiseaseQuery::new(&params.disease, params.speciality.as_deref()).map_err(ToolError::from)?;
    answer(service, query, params.cache).await
}
