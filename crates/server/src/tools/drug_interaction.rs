//! drug_interaction tool implementation.
//!
//! Analyzes the interaction between two medicines. The pair is unordered:
//! asking about B with A reuses the answer for A with B.

use medkit_client::DomainService;
use medkit_client::domains::DrugInteractionQuery;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{CacheFlags, answer};
use crate::error::ToolError;
use crate::services::Model;

/// Parameters for the drug_interaction tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DrugInteractionParams {
    /// First medicine.
    pub medicine1: String,

    /// Dosage of the first medicine, e.g. "500mg twice daily".
    #[serde(default)]
    pub dosage1: Option<String>,

    /// Second medicine.
    pub medicine2: String,

    #[serde(default)]
    pub dosage2: Option<String>,

    /// Patient age in years.
    #[serde(default)]
    pub age: Option<i64>,

    /// Relevant patient conditions, free text.
    #[serde(default)]
    pub conditions: Option<String>,

    #[serde(flatten)]
    pub cache: CacheFlags,
}

/// Implementation of the drug_interaction tool.
pub async fn drug_interaction_impl(
    service: &DomainService<DrugInteractionQuery, Model>, params: DrugInteractionParams,
) -> Result<CallToolResult, McpError> {
    let query = DrugInteractionQuery::new(
        (&params.medicine1, params.dosage1.as_deref()),
        (&params.medicine2, params.dosage2.as_deref()),
        params.age,
        params.conditions.as_deref(),
    )
    .map_err(ToolError::from)?;
    answer(service, query, params.cache).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{CannedModel, output, service};
    use rmcp::model::ErrorCode;

    const REPLY: &str = r#"{
        "interaction_details": {
            "drug1_name": "Warfarin",
            "drug2_name": "Aspirin",
            "severity_level": "SIGNIFICANT",
            "mechanism_of_interaction": "Additive antiplatelet and anticoagulant effects.",
            "clinical_effects": "Increased bleeding risk.",
            "management_recommendations": "Avoid unless specifically indicated.",
            "alternative_medicines": "Paracetamol for analgesia.",
            "confidence_level": "HIGH",
            "data_source_type": "Clinical Studies"
        },
        "technical_summary": "Major bleeding risk.",
        "data_availability": { "data_available": true }
    }"#;

    fn params(first: &str, second: &str) -> DrugInteractionParams {
        DrugInteractionParams {
            medicine1: first.into(),
            dosage1: None,
            medicine2: second.into(),
            dosage2: None,
            age: Some(70),
            conditions: None,
            cache: CacheFlags::default(),
        }
    }

    #[tokio::test]
    async fn test_drug_interaction() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::new(REPLY);
        let svc = service::<DrugInteractionQuery>(&dir, &model).await;

        let out = output(&drug_interaction_impl(&svc, params("warfarin", "aspirin")).await.unwrap());
        assert_eq!(out["module"], "drug_drug_interaction");
        assert_eq!(out["result"]["interaction_details"]["severity_level"], "SIGNIFICANT");
        assert_eq!(out["result"]["data_availability"]["data_available"], true);
    }

    #[tokio::test]
    async fn test_swapped_pair_is_a_hit() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::new(REPLY);
        let svc = service::<DrugInteractionQuery>(&dir, &model).await;

        let first = output(&drug_interaction_impl(&svc, params("Warfarin", "Aspirin")).await.unwrap());
        let second = output(&drug_interaction_impl(&svc, params("aspirin", "warfarin")).await.unwrap());
        assert_eq!(second["cache"]["status"], "hit");
        assert_eq!(first["key"], second["key"]);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_age_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::new(REPLY);
        let svc = service::<DrugInteractionQuery>(&dir, &model).await;

        let mut bad = params("warfarin", "aspirin");
        bad.age = Some(200);
        let err = drug_interaction_impl(&svc, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32602));
        assert!(err.message.contains("age"));
        assert_eq!(model.calls(), 0);
    }
}
