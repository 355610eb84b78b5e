//! Comprehensive disease records.

use medkit_core::cache::{CacheQuery, KeyBuilder, KeyError};
use medkit_core::registry::DISEASE_INFO;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{QueryError, non_blank, optional_text};
use crate::generator::Prompted;

pub const DEFAULT_SPECIALITY: &str = "Internal Medicine";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseIdentity {
    /// Common name of the disease.
    pub name: String,
    /// ICD-10 code.
    #[serde(default)]
    pub icd_10_code: Option<String>,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseBackground {
    pub definition: String,
    pub pathophysiology: String,
    pub etiology: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskFactors {
    /// Risk factors that can be changed (smoking, diet, exercise).
    pub modifiable: Vec<String>,
    /// Risk factors that cannot be changed (age, genetics, family history).
    pub non_modifiable: Vec<String>,
    pub environmental: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseEpidemiology {
    pub prevalence: String,
    pub incidence: String,
    pub risk_factors: RiskFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseClinicalPresentation {
    pub symptoms: Vec<String>,
    /// Objective signs observed by a clinician.
    pub signs: Vec<String>,
    /// Progression without treatment.
    pub natural_history: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosticCriteria {
    pub symptoms: Vec<String>,
    pub physical_exam: Vec<String>,
    pub laboratory_tests: Vec<String>,
    pub imaging_studies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseDiagnosis {
    pub diagnostic_criteria: DiagnosticCriteria,
    pub differential_diagnosis: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseManagement {
    pub treatment_options: Vec<String>,
    pub prevention: Vec<String>,
    pub prognosis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseResearch {
    pub current_research: String,
    pub recent_advancements: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseSpecialPopulations {
    pub pediatric: String,
    pub geriatric: String,
    /// Pregnancy and lactation.
    pub pregnancy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseLivingWith {
    pub quality_of_life: String,
    pub support_resources: Vec<String>,
}

/// Full disease record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiseaseInfo {
    pub identity: DiseaseIdentity,
    pub background: DiseaseBackground,
    pub epidemiology: DiseaseEpidemiology,
    pub clinical_presentation: DiseaseClinicalPresentation,
    pub diagnosis: DiseaseDiagnosis,
    pub management: DiseaseManagement,
    pub research: DiseaseResearch,
    pub special_populations: DiseaseSpecialPopulations,
    pub living_with: DiseaseLivingWith,
}

/// Disease lookup, written for clinicians of one speciality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseQuery {
    disease: String,
    speciality: String,
}

impl DiseaseQuery {
    /// `speciality` defaults to Internal Medicine when absent or blank.
    pub fn new(disease: &str, speciality: Option<&str>) -> Result<Self, QueryError> {
        Ok(Self {
            disease: non_blank("disease", disease)?,
            speciality: optional_text(speciality).unwrap_or_else(|| DEFAULT_SPECIALITY.to_string()),
        })
    }
}

impl CacheQuery for DiseaseQuery {
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
        key.require("disease", &self.disease)?.require("speciality", &self.speciality)?;
        Ok(())
    }
}

impl Prompted for DiseaseQuery {
    const MODULE: &'static str = DISEASE_INFO;
    type Output = DiseaseInfo;

    fn prompt(&self) -> String {
        format!(
            "Generate comprehensive information for the disease: {}. \
             Cover identity, background, epidemiology, clinical presentation, diagnosis, management, \
             research, special populations and living with the disease. \
             Focus on providing comprehensive, evidence-based information. \
             The target audience is medical professionals in {}.",
            self.disease, self.speciality
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medkit_core::cache::derive_key;

    #[test]
    fn test_default_speciality() {
        let query = DiseaseQuery::new("Asthma", None).unwrap();
        assert_eq!(query, DiseaseQuery::new("Asthma", Some(DEFAULT_SPECIALITY)).unwrap());
        assert_eq!(DiseaseQuery::new("Asthma", Some("  ")).unwrap(), query);
    }

    #[test]
    fn test_empty_disease_rejected() {
        assert_eq!(DiseaseQuery::new("", None).unwrap_err(), QueryError::Empty { field: "disease" });
    }

    #[test]
    fn test_speciality_is_part_of_key() {
        let internal = DiseaseQuery::new("Asthma", None).unwrap();
        let paediatric = DiseaseQuery::new("Asthma", Some("Pediatrics")).unwrap();
        assert_ne!(derive_key(DISEASE_INFO, &internal).unwrap(), derive_key(DISEASE_INFO, &paediatric).unwrap());

        let explicit = DiseaseQuery::new("asthma", Some("internal medicine")).unwrap();
        assert_eq!(derive_key(DISEASE_INFO, &internal).unwrap(), derive_key(DISEASE_INFO, &explicit).unwrap());
    }

    #[test]
    fn test_prompt_names_audience() {
        let prompt = DiseaseQuery::new("Gout", Some("Rheumatology")).unwrap().prompt();
        assert!(prompt.contains("disease: Gout"));
        assert!(prompt.contains("medical professionals in Rheumatology"));
    }

    #[test]
    fn test_schema_lists_sections() {
        let schema = serde_json::to_value(schemars::schema_for!(DiseaseInfo)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 9);
        assert!(required.iter().any(|f| f == "special_populations"));
    }
}
