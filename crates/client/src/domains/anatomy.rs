//! Anatomical structure references.

use medkit_core::cache::{CacheQuery, KeyBuilder, KeyError};
use medkit_core::registry::MEDICAL_ANATOMY;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{QueryError, non_blank};
use crate::generator::Prompted;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnatomyOverview {
    /// Official anatomical name.
    pub structure_name: String,
    pub common_names: Vec<String>,
    /// Bone, muscle, organ, vessel, nerve, ...
    pub classification: String,
    pub body_system: String,
    /// Germ layer of origin.
    pub embryological_origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnatomicalPosition {
    pub location: String,
    pub body_regions: Vec<String>,
    /// Palpable landmarks used to find the structure.
    pub surface_landmarks: Vec<String>,
    pub relationships: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrossMorphology {
    pub shape: String,
    /// Typical length, width, diameter or volume.
    pub dimensions: String,
    pub attachment_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MicroscopicStructure {
    pub tissue_types: Vec<String>,
    pub cellular_components: Vec<String>,
    #[serde(default)]
    pub histological_layers: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnatomicalFunction {
    pub primary_functions: Vec<String>,
    pub secondary_functions: Vec<String>,
    pub mechanism: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VascularInnervation {
    pub arterial_supply: String,
    pub venous_drainage: String,
    #[serde(default)]
    pub lymphatic_drainage: Option<String>,
    pub nerve_supply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VariationsAndAnomalies {
    pub anatomical_variations: Vec<String>,
    pub congenital_anomalies: Vec<String>,
    pub age_related_changes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DevelopmentalAnatomy {
    pub embryological_development: String,
    pub postnatal_growth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnatomyClinicalSignificance {
    pub common_pathologies: Vec<String>,
    pub injury_vulnerability: String,
    /// Pain and referred pain patterns.
    pub pain_patterns: String,
    /// How the structure is examined at the bedside.
    pub examination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImagingCharacteristics {
    pub radiograph: String,
    pub ultrasound: String,
    pub ct: String,
    pub mri: String,
    /// Best modalities for visualising the structure.
    pub preferred_modalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SurgicalLandmarks {
    pub surgical_approaches: Vec<String>,
    /// Nearby structures at risk during access.
    pub risk_structures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnatomySeeAlso {
    pub related_structures: Vec<String>,
    /// Adjacent, continuous, functionally related, shared innervation, ...
    pub connection_types: Vec<String>,
    pub reason: String,
}

/// Full reference entry for one anatomical structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MedicalAnatomy {
    pub overview: AnatomyOverview,
    pub position: AnatomicalPosition,
    pub gross_morphology: GrossMorphology,
    pub microscopic_structure: MicroscopicStructure,
    pub function: AnatomicalFunction,
    pub vascular_innervation: VascularInnervation,
    pub variations: VariationsAndAnomalies,
    pub development: DevelopmentalAnatomy,
    pub clinical_significance: AnatomyClinicalSignificance,
    pub imaging: ImagingCharacteristics,
    pub surgical_landmarks: SurgicalLandmarks,
    pub see_also: AnatomySeeAlso,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnatomyQuery {
    structure: String,
}

impl AnatomyQuery {
    pub fn new(structure: &str) -> Result<Self, QueryError> {
        Ok(Self { structure: non_blank("structure", structure)? })
    }
}

impl CacheQuery for AnatomyQuery {
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
        key.require("structure", &self.structure)?;
        Ok(())
    }
}

impl Prompted for AnatomyQuery {
    const MODULE: &'static str = MEDICAL_ANATOMY;
    type Output = MedicalAnatomy;

    fn prompt(&self) -> String {
        format!(
            "Generate comprehensive anatomical information for: {}\n\n\
             Include the overview and classification, anatomical position, gross morphology, \
             microscopic structure, functions, vascular supply and innervation, variations and anomalies, \
             developmental anatomy, clinical significance, imaging characteristics, surgical landmarks \
             and approaches.\n\n\
             For see_also, list adjacent structures, functionally related structures, structures with \
             shared innervation and structures in the same system, with the type of each connection.\n\n\
             Provide accurate, detailed anatomical information based on standard anatomical references.",
            self.structure
        )
    }
}
