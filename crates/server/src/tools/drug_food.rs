//! drug_food_interaction tool implementation.

use medkit_client::DomainService;
use medkit_client::domains::DrugFoodQuery;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{CacheFlags, answer};
use crate::error::ToolError;
use crate::services::Model;

/// Parameters for the drug_food_interaction tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DrugFoodParams {
    /// Medicine to check.
    pub medicine: String,

    /// Patient diet, e.g. "vegetarian" or "ketogenic".
    #[serde(default)]
    pub diet_type: Option<String>,

    /// Relevant patient conditions, free text.
    #[serde(default)]
    pub conditions: Option<String>,

    /// Patient age in years.
    #[serde(default)]
    pub age: Option<i64>,

    /// Specific foods to check, comma-separated.
    #[serde(default)]
    pub specific_food: Option<String>,

    #[serde(flatten)]
    pub cache: CacheFlags,
}

/// Implementation of the drug_food_interaction tool.
pub async fn drug_food_impl(
    service: &DomainService<DrugFoodQuery, Model>, params: DrugFoodParams,
) -> Result<CallToolResult, McpError> {
    let query = DrugFoodQuery::new(
        &params.medicine,
        params.diet_type.as_deref(),
        params.conditions.as_deref(),
        params.age,
        params.specific_food.as_deref(),
    )
    .map_err(ToolError::from)?;
    answer(service, query, params.cache).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{CannedModel, output, service};

    const NO_DATA: &str = r#"{
        "technical_summary": "No reliable food interaction data found.",
        "data_availability": { "data_available": false, "reason": "Unknown medicine." }
    }"#;

    fn params(medicine: &str) -> DrugFoodParams {
        DrugFoodParams {
            medicine: medicine.into(),
            diet_type: None,
            conditions: None,
            age: None,
            specific_food: None,
            cache: CacheFlags::default(),
        }
    }

    #[tokio::test]
    async fn test_no_data_answer_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::new(NO_DATA);
        let svc = service::<DrugFoodQuery>(&dir, &model).await;

        let out = output(&drug_food_impl(&svc, params("zzxq")).await.unwrap());
        assert_eq!(out["module"], "drug_food_interaction");
        assert_eq!(out["result"]["data_availability"]["data_available"], false);
        assert!(out["result"]["interaction_details"].is_null());

        let again = output(&drug_food_impl(&svc, params("ZZXQ")).await.unwrap());
        assert_eq!(again["cache"]["status"], "hit");
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_specific_food_changes_key() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::new(NO_DATA);
        let svc = service::<DrugFoodQuery>(&dir, &model).await;

        let plain = output(&drug_food_impl(&svc, params("warfarin")).await.unwrap());
        let mut with_food = params("warfarin");
        with_food.specific_food = Some("grapefruit".into());
        let food = output(&drug_food_impl(&svc, with_food).await.unwrap());

        assert_ne!(plain["key"], food["key"]);
        assert_eq!(food["cache"]["status"], "stored");
    }
}
