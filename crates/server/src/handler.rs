//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::services::Services;
use crate::tools::anatomy::{AnatomyParams, anatomy_impl};
use crate::tools::cache::{
    CacheGetParams, CacheRemoveParams, CacheStatsParams, ListModulesParams, get_impl, list_modules_impl, remove_impl,
    stats_impl,
};
use crate::tools::dictionary::{MedicalTermParams, medical_term_impl};
use crate::tools::disease_info::{DiseaseInfoParams, disease_info_impl};
use crate::tools::drug_food::{DrugFoodParams, drug_food_impl};
use crate::tools::drug_interaction::{DrugInteractionParams, drug_interaction_impl};
use crate::tools::exam_questions::{ExamQuestionsParams, exam_questions_impl};
use crate::tools::test_info::{MedicalTestParams, medical_test_impl};

/// The main MCP server handler for medkit.
#[derive(Clone)]
pub struct MedkitServer {
    services: Arc<Services>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl MedkitServer {
    /// Create a new server handler.
    pub fn new(services: Arc<Services>) -> Self {
        Self { services, tool_router: Self::tool_router() }
    }

    #[tool(description = "Comprehensive information about a disease: background, epidemiology, presentation, \
                          diagnosis, management, research, special populations. Answers are cached.")]
    async fn disease_info(&self, params: Parameters<DiseaseInfoParams>) -> Result<CallToolResult, McpError> {
        disease_info_impl(&self.services.disease, params.0).await
    }

    #[tool(description = "Interaction between two medicines with severity, mechanism, management and a \
                          patient-friendly summary. The order of the two medicines does not matter.")]
    async fn drug_interaction(&self, params: Parameters<DrugInteractionParams>) -> Result<CallToolResult, McpError> {
        drug_interaction_impl(&self.services.drug_interaction, params.0).await
    }

    #[tool(description = "Food and beverage interactions for a medicine, by food category, with timing and \
                          dietary guidance.")]
    async fn drug_food_interaction(&self, params: Parameters<DrugFoodParams>) -> Result<CallToolResult, McpError> {
        drug_food_impl(&self.services.drug_food, params.0).await
    }

    #[tool(description = "Dictionary definition of a medical term.")]
    async fn medical_term(&self, params: Parameters<MedicalTermParams>) -> Result<CallToolResult, McpError> {
        medical_term_impl(&self.services.dictionary, params.0).await
    }

    #[tool(description = "Reference entry for an anatomical structure: position, morphology, blood and nerve \
                          supply, variations, clinical significance, imaging and surgical landmarks.")]
    async fn anatomy(&self, params: Parameters<AnatomyParams>) -> Result<CallToolResult, McpError> {
        anatomy_impl(&self.services.anatomy, params.0).await
    }

    #[tool(description = "Patient questions for a physical examination, grouped by technique. Use list_modules \
                          for the accepted exam types.")]
    async fn exam_questions(&self, params: Parameters<ExamQuestionsParams>) -> Result<CallToolResult, McpError> {
        exam_questions_impl(&self.services.exam_questions, params.0).await
    }

    #[tool(description = "Reference entry for a medical test: purpose, preparation, specimen, procedure, \
                          reference ranges, interpretation and follow-up.")]
    async fn medical_test_info(&self, params: Parameters<MedicalTestParams>) -> Result<CallToolResult, McpError> {
        medical_test_impl(&self.services.test_info, params.0).await
    }

    #[tool(description = "List the query modules, their categories and models, and the accepted exam types.")]
    async fn list_modules(&self, params: Parameters<ListModulesParams>) -> Result<CallToolResult, McpError> {
        list_modules_impl(&self.services, params.0).await
    }

    #[tool(description = "Entry counts and byte usage of the per-module cache stores.")]
    async fn cache_stats(&self, params: Parameters<CacheStatsParams>) -> Result<CallToolResult, McpError> {
        stats_impl(&self.services, params.0).await
    }

    #[tool(description = "Read a cached answer by module and key.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.services, params.0).await
    }

    #[tool(description = "Delete a cached answer by module and key so the next query regenerates it.")]
    async fn cache_remove(&self, params: Parameters<CacheRemoveParams>) -> Result<CallToolResult, McpError> {
        remove_impl(&self.services, params.0).await
    }
}

impl ServerHandler for MedkitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "medkit".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Medical reference answers generated by Gemini and cached per module. Answers are informational \
                 and not a substitute for clinical judgement."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
