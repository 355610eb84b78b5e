//! Medical test and diagnostic references.

use medkit_core::cache::{CacheQuery, KeyBuilder, KeyError};
use medkit_core::registry::MEDICAL_TEST_INFO;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{QueryError, non_blank};
use crate::generator::Prompted;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestPurpose {
    pub primary_purpose: String,
    pub diagnostic_uses: Vec<String>,
    pub monitoring_uses: Vec<String>,
    /// Who should get the test as preventive screening.
    pub screening_uses: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestIndications {
    pub when_ordered: Vec<String>,
    pub symptoms_prompting_test: Vec<String>,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestPreparation {
    /// Whether fasting is needed, and for how many hours.
    pub fasting: String,
    /// Medications to stop or adjust, with washout periods.
    pub medication_adjustments: Vec<String>,
    pub timing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpecimenInformation {
    /// Blood, urine, tissue, saliva, ...
    pub sample_type: String,
    pub collection_method: String,
    pub handling: String,
    pub rejection_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestProcedure {
    pub procedure_type: String,
    pub steps: Vec<String>,
    pub duration: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiscomfortAndRisks {
    /// None, mild, moderate or severe.
    pub discomfort_level: String,
    pub common_side_effects: Vec<String>,
    pub serious_risks: Vec<String>,
    pub contraindications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterferingFactors {
    pub medications: Vec<String>,
    /// Supplements and herbs, biotin included for immunoassays.
    pub supplements: Vec<String>,
    /// Hemolysis, icterus, lipemia, hook effect, heterophile antibodies.
    pub assay_interferences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestResults {
    pub turnaround_time: String,
    /// Reference values with numerical ranges.
    pub normal_range: String,
    pub abnormal_result_meanings: Vec<String>,
    /// Panic values that require immediate notification.
    #[serde(default)]
    pub critical_values: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestInterpretation {
    pub what_normal_means: String,
    pub what_abnormal_means: String,
    pub confirmatory_tests: Vec<String>,
    #[serde(default)]
    pub sensitivity: Option<String>,
    #[serde(default)]
    pub specificity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FollowUpActions {
    pub normal_result_actions: Vec<String>,
    pub abnormal_result_actions: Vec<String>,
    pub repeat_testing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestPopulations {
    pub pediatric: String,
    pub geriatric: String,
    /// Trimester-specific ranges where they differ.
    pub pregnancy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestAlternatives {
    pub alternative_tests: Vec<String>,
    pub complementary_tests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestLimitations {
    pub cannot_detect: Vec<String>,
    pub false_result_causes: Vec<String>,
}

/// Full reference entry for one medical test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MedicalTestInfo {
    pub test_name: String,
    pub alternative_names: Vec<String>,
    /// Blood test, imaging, biopsy, ...
    pub test_category: String,
    pub medical_specialties: Vec<String>,
    pub purpose: TestPurpose,
    pub indications: TestIndications,
    pub preparation: TestPreparation,
    pub specimen: SpecimenInformation,
    pub procedure: TestProcedure,
    pub discomfort_and_risks: DiscomfortAndRisks,
    pub interfering_factors: InterferingFactors,
    pub results: TestResults,
    pub interpretation: TestInterpretation,
    pub follow_up: FollowUpActions,
    pub populations: TestPopulations,
    pub alternatives: TestAlternatives,
    pub limitations: TestLimitations,
    /// Simple explanation for patients.
    pub plain_language_explanation: String,
    pub key_takeaways: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalTestQuery {
    test_name: String,
}

impl MedicalTestQuery {
    pub fn new(test_name: &str) -> Result<Self, QueryError> {
        Ok(Self { test_name: non_blank("test_name", test_name)? })
    }
}

impl CacheQuery for MedicalTestQuery {
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
        key.require("test_name", &self.test_name)?;
        Ok(())
    }
}

impl Prompted for MedicalTestQuery {
    const MODULE: &'static str = MEDICAL_TEST_INFO;
    type Output = MedicalTestInfo;

    fn prompt(&self) -> String {
        format!(
            "Generate comprehensive medical test information for: {}\n\n\
             Include detailed information about:\n\
             1. Test name and alternative names\n\
             2. Purpose and clinical use\n\
             3. Test indications and when it is ordered\n\
             4. Sample requirements and collection procedures\n\
             5. Test methodology and procedure\n\
             6. Normal reference ranges and result interpretation\n\
             7. Preparatory requirements and restrictions\n\
             8. Risks, interfering factors and limitations\n\
             9. Considerations for children, older adults and pregnancy\n\
             10. Follow-up actions and alternative tests\n\n\
             Provide accurate, evidence-based medical test information.",
            self.test_name
        )
    }
}
