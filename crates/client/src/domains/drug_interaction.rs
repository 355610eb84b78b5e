//! Drug-drug interaction analysis.
//!
//! The pair is unordered: asking about A with B hits the entry stored for B
//! with A.

use medkit_core::cache::key::normalize;
use medkit_core::cache::{CacheQuery, KeyBuilder, KeyError};
use medkit_core::registry::DRUG_DRUG_INTERACTION;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{QueryError, check_age, non_blank, optional_text};
use crate::generator::Prompted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionSeverity {
    None,
    Minor,
    Mild,
    Moderate,
    Significant,
    Contraindicated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DataSourceType {
    #[serde(rename = "Clinical Studies")]
    ClinicalStudies,
    #[serde(rename = "Pharmacokinetic Analysis")]
    PharmacokineticAnalysis,
    #[serde(rename = "AI-Generated")]
    AiGenerated,
    #[serde(rename = "Case Reports")]
    CaseReports,
    #[serde(rename = "Regulatory Data")]
    RegulatoryData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrugInteractionDetails {
    pub drug1_name: String,
    pub drug2_name: String,
    pub severity_level: InteractionSeverity,
    pub mechanism_of_interaction: String,
    pub clinical_effects: String,
    pub management_recommendations: String,
    pub alternative_medicines: String,
    pub confidence_level: ConfidenceLevel,
    pub data_source_type: DataSourceType,
    #[serde(default)]
    pub references: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PatientFriendlySummary {
    pub simple_explanation: String,
    pub what_patient_should_do: String,
    pub warning_signs: String,
    pub when_to_seek_help: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataAvailability {
    pub data_available: bool,
    /// Why data is missing, when it is.
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrugInteractionResult {
    #[serde(default)]
    pub interaction_details: Option<DrugInteractionDetails>,
    pub technical_summary: String,
    #[serde(default)]
    pub patient_friendly_summary: Option<PatientFriendlySummary>,
    pub data_availability: DataAvailability,
}

/// One medicine with an optional dosage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugDose {
    pub name: String,
    pub dosage: Option<String>,
}

impl DrugDose {
    fn new(field: &'static str, name: &str, dosage: Option<&str>) -> Result<Self, QueryError> {
        Ok(Self { name: non_blank(field, name)?, dosage: optional_text(dosage) })
    }

    /// Key member: name and dosage, both length-prefixed after normalization.
    fn key_member(&self) -> String {
        let name = normalize(&self.name);
        let dosage = self
            .dosage
            .as_deref()
            .map(normalize)
            .map_or_else(|| "-".to_string(), |d| format!("{}:{}", d.len(), d));
        format!("{}:{}{}", name.len(), name, dosage)
    }

    fn describe(&self) -> String {
        match &self.dosage {
            Some(dosage) => format!("{} ({dosage})", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugInteractionQuery {
    first: DrugDose,
    second: DrugDose,
    age: Option<u32>,
    conditions: Option<String>,
}

impl DrugInteractionQuery {
    pub fn new(
        first: (&str, Option<&str>), second: (&str, Option<&str>), age: Option<i64>, conditions: Option<&str>,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            first: DrugDose::new("medicine1", first.0, first.1)?,
            second: DrugDose::new("medicine2", second.0, second.1)?,
            age: check_age(age)?,
            conditions: optional_text(conditions),
        })
    }
}

impl CacheQuery for DrugInteractionQuery {
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
        key.unordered("drugs", [self.first.key_member(), self.second.key_member()])?
            .optional(self.age)
            .optional(self.conditions.as_deref());
        Ok(())
    }
}

impl Prompted for DrugInteractionQuery {
    const MODULE: &'static str = DRUG_DRUG_INTERACTION;
    type Output = DrugInteractionResult;

    fn prompt(&self) -> String {
        let mut context = vec![format!("Checking interaction between {} and {}", self.first.name, self.second.name)];
        if let Some(age) = self.age {
            context.push(format!("Patient age: {age} years"));
        }
        for drug in [&self.first, &self.second] {
            if let Some(dosage) = &drug.dosage {
                context.push(format!("{} dosage: {dosage}", drug.name));
            }
        }
        if let Some(conditions) = &self.conditions {
            context.push(format!("Patient conditions: {conditions}"));
        }

        format!(
            "{} and {} interaction analysis. {}.",
            self.first.describe(),
            self.second.describe(),
            context.join(". ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SchemaGenerator;
    use crate::generator::testing::ScriptedModel;
    use medkit_core::cache::{FetchOptions, derive_key};
    use medkit_core::{CachedAccessor, StorageHandle};
    use std::sync::Arc;

    const REPLY: &str = r#"{
        "interaction_details": {
            "drug1_name": "Warfarin",
            "drug2_name": "Aspirin",
            "severity_level": "SIGNIFICANT",
            "mechanism_of_interaction": "Additive antiplatelet and anticoagulant effects.",
            "clinical_effects": "Increased bleeding risk",
            "management_recommendations": "Avoid combination unless indicated",
            "alternative_medicines": "Acetaminophen for analgesia",
            "confidence_level": "HIGH",
            "data_source_type": "Clinical Studies"
        },
        "technical_summary": "Major bleeding risk.",
        "data_availability": { "data_available": true }
    }"#;

    fn key(query: &DrugInteractionQuery) -> String {
        derive_key(DRUG_DRUG_INTERACTION, query).unwrap().to_string()
    }

    #[test]
    fn test_drug_order_does_not_matter() {
        let ab = DrugInteractionQuery::new(("Warfarin", Some("5mg")), ("Aspirin", None), Some(70), None).unwrap();
        let ba = DrugInteractionQuery::new(("aspirin", None), ("warfarin", Some("5MG")), Some(70), None).unwrap();
        assert_eq!(key(&ab), key(&ba));
    }

    #[test]
    fn test_dosage_stays_with_its_drug() {
        let a = DrugInteractionQuery::new(("Warfarin", Some("5mg")), ("Aspirin", None), None, None).unwrap();
        let b = DrugInteractionQuery::new(("Warfarin", None), ("Aspirin", Some("5mg")), None, None).unwrap();
        assert_ne!(key(&a), key(&b));
    }

    #[test]
    fn test_age_and_conditions_affect_key() {
        let bare = DrugInteractionQuery::new(("a", None), ("b", None), None, None).unwrap();
        let aged = DrugInteractionQuery::new(("a", None), ("b", None), Some(0), None).unwrap();
        let sick = DrugInteractionQuery::new(("a", None), ("b", None), None, Some("CKD")).unwrap();
        assert_ne!(key(&bare), key(&aged));
        assert_ne!(key(&bare), key(&sick));
    }

    #[test]
    fn test_validation() {
        let err = DrugInteractionQuery::new(("", None), ("b", None), None, None).unwrap_err();
        assert_eq!(err, QueryError::Empty { field: "medicine1" });
        let err = DrugInteractionQuery::new(("a", None), (" ", None), None, None).unwrap_err();
        assert_eq!(err, QueryError::Empty { field: "medicine2" });
        let err = DrugInteractionQuery::new(("a", None), ("b", None), Some(200), None).unwrap_err();
        assert_eq!(err, QueryError::AgeOutOfRange { age: 200 });
    }

    #[test]
    fn test_prompt_context() {
        let query =
            DrugInteractionQuery::new(("Warfarin", Some("5mg")), ("Aspirin", None), Some(70), Some("atrial fibrillation"))
                .unwrap();
        let prompt = query.prompt();
        assert!(prompt.starts_with("Warfarin (5mg) and Aspirin interaction analysis."));
        assert!(prompt.contains("Patient age: 70 years"));
        assert!(prompt.contains("Warfarin dosage: 5mg"));
        assert!(prompt.contains("Patient conditions: atrial fibrillation"));
    }

    #[tokio::test]
    async fn test_reversed_pair_hits_cache() {
        let model = Arc::new(ScriptedModel::replying(REPLY));
        let storage = StorageHandle::open_in_memory(1024 * 1024, 256).await.unwrap();
        let config = medkit_core::AppConfig::default().cache_config(DRUG_DRUG_INTERACTION);
        let service = CachedAccessor::with_storage(
            DRUG_DRUG_INTERACTION,
            config,
            storage,
            SchemaGenerator::<DrugInteractionQuery, _>::new(model.clone(), "gemini-1.5-pro"),
        );

        let ab = DrugInteractionQuery::new(("Warfarin", None), ("Aspirin", None), None, None).unwrap();
        let ba = DrugInteractionQuery::new(("Aspirin", None), ("Warfarin", None), None, None).unwrap();

        let first = service.fetch(&ab, FetchOptions::default()).await.unwrap();
        let details = first.value.interaction_details.as_ref().unwrap();
        assert_eq!(details.severity_level, InteractionSeverity::Significant);
        assert_eq!(details.data_source_type, DataSourceType::ClinicalStudies);

        let second = service.fetch(&ba, FetchOptions::default()).await.unwrap();
        assert!(second.outcome.is_hit());
        assert_eq!(model.calls(), 1);
    }
}
