//! anatomy tool implementation.

use medkit_client::DomainService;
use medkit_client::domains::AnatomyQuery;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{CacheFlags, answer};
use crate::error::ToolError;
use crate::services::Model;

/// Parameters for the anatomy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnatomyParams {
    /// Anatomical structure, e.g. "femur" or "biceps brachii".
    pub structure: String,

    #[serde(flatten)]
    pub cache: CacheFlags,
}

/// Implementation of the anatomy tool.
pub async fn anatomy_impl(
    service: &DomainService<AnatomyQuery, Model>, params: AnatomyParams,
) -> Result<CallToolResult, McpError> {
    let query = AnatomyQuery::new(&params.structure).map_err(ToolError::from)?;
    answer(service, query, params.cache).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{CannedModel, output, service};
    use rmcp::model::ErrorCode;

    const REPLY: &str = r#"{
        "overview": {
            "structure_name": "Femur",
            "common_names": ["thigh bone"],
            "classification": "Long bone",
            "body_system": "Skeletal",
            "embryological_origin": "Mesoderm"
        },
        "position": {
            "location": "Thigh",
            "body_regions": ["lower limb"],
            "surface_landmarks": ["greater trochanter"],
            "relationships": ["articulates with the acetabulum"]
        },
        "gross_morphology": {"shape": "Long cylindrical shaft", "dimensions": "About 45 cm", "attachment_points": ["gluteus medius"]},
        "microscopic_structure": {"tissue_types": ["compact bone"], "cellular_components": ["osteocytes"]},
        "function": {"primary_functions": ["weight bearing"], "secondary_functions": ["hematopoiesis"], "mechanism": "Transmits load from hip to knee."},
        "vascular_innervation": {
            "arterial_supply": "Medial circumflex femoral artery",
            "venous_drainage": "Femoral vein",
            "nerve_supply": "Femoral nerve"
        },
        "variations": {"anatomical_variations": ["coxa vara"], "congenital_anomalies": [], "age_related_changes": "Loss of bone density."},
        "development": {"embryological_development": "Endochondral ossification.", "postnatal_growth": "Growth plates close in late adolescence."},
        "clinical_significance": {
            "common_pathologies": ["hip fracture"],
            "injury_vulnerability": "Neck fractures in the elderly.",
            "pain_patterns": "Hip pain may refer to the knee.",
            "examination": "Palpation of the greater trochanter."
        },
        "imaging": {
            "radiograph": "Dense cortical outline",
            "ultrasound": "Limited to the cortex",
            "ct": "Fracture detail",
            "mri": "Marrow edema",
            "preferred_modalities": ["radiograph"]
        },
        "surgical_landmarks": {"surgical_approaches": ["lateral approach"], "risk_structures": ["sciatic nerve"]},
        "see_also": {"related_structures": ["tibia"], "connection_types": ["adjacent"], "reason": "Forms the knee joint."}
    }"#;

    fn params(structure: &str) -> AnatomyParams {
        AnatomyParams { structure: structure.into(), cache: CacheFlags::default() }
    }

    #[tokio::test]
    async fn test_anatomy() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::new(REPLY);
        let svc = service::<AnatomyQuery>(&dir, &model).await;

        let out = output(&anatomy_impl(&svc, params("Femur")).await.unwrap());
        assert_eq!(out["module"], "medical_anatomy");
        assert_eq!(out["result"]["overview"]["body_system"], "Skeletal");
        assert!(out["result"]["vascular_innervation"]["lymphatic_drainage"].is_null());

        let again = output(&anatomy_impl(&svc, params("  FEMUR")).await.unwrap());
        assert_eq!(again["cache"]["status"], "hit");
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_structure_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::new(REPLY);
        let svc = service::<AnatomyQuery>(&dir, &model).await;

        let err = anatomy_impl(&svc, params("")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32602));
        assert!(err.message.contains("structure"));
        assert_eq!(model.calls(), 0);
    }
}
