//! list_modules tool implementation.

use medkit_core::registry::{self, Category, ModuleSpec};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::Services;
use crate::tools::exam_questions::exam_types;
use crate::tools::to_result;

/// Parameters for the list_modules tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListModulesParams {
    /// Only list modules in this category.
    #[serde(default)]
    pub category: Option<Category>,
}

/// One module as exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    /// Model in use after configuration overrides.
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListModulesOutput {
    pub modules: Vec<ModuleInfo>,
    pub exam_types: Vec<&'static str>,
}

/// Implementation of the list_modules tool.
pub async fn list_modules_impl(services: &Services, params: ListModulesParams) -> Result<CallToolResult, McpError> {
    let specs: Vec<&ModuleSpec> = match params.category {
        Some(category) => registry::by_category(category).collect(),
        None => registry::modules().iter().collect(),
    };

    let mut modules = Vec::with_capacity(specs.len());
    for spec in specs {
        let cache = services.module(spec.name)?;
        modules.push(ModuleInfo {
            name: spec.name,
            category: spec.category,
            description: spec.description,
            model: cache.model.to_string(),
        });
    }

    to_result(&ListModulesOutput { modules, exam_types: exam_types() })
}
