//! exam_questions tool implementation.
//!
//! Generates physical examination questions for one exam type.

use medkit_client::DomainService;
use medkit_client::domains::{ExamQuery, ExamType};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{CacheFlags, answer};
use crate::error::ToolError;
use crate::services::Model;

/// Parameters for the exam_questions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExamQuestionsParams {
    /// Exam type, e.g. "Cardiovascular" or "Skin Exam". See `exam_types()`.
    pub exam_type: String,

    /// Patient age in years.
    #[serde(default)]
    pub age: Option<i64>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(flatten)]
    pub cache: CacheFlags,
}

/// Names accepted for `exam_type`.
pub fn exam_types() -> Vec<&'static str> {
    ExamType::ALL.iter().map(|t| t.name()).collect()
}

/// Implementation of the exam_questions tool.
pub async fn exam_questions_impl(
    service: &DomainService<ExamQuery, Model>, params: ExamQuestionsParams,
) -> Result<CallToolResult, McpError> {
    let query = ExamQuery::new(&params.exam_type, params.age, params.gender.as_deref()).map_err(ToolError::from)?;
    answer(service, query, params.cache).await
}
