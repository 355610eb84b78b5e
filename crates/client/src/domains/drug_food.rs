//! Drug-food interaction analysis.

use medkit_core::cache::{CacheQuery, KeyBuilder, KeyError};
use medkit_core::registry::DRUG_FOOD_INTERACTION;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::drug_interaction::{ConfidenceLevel, DataAvailability, InteractionSeverity};
use super::{QueryError, check_age, non_blank, optional_text};
use crate::generator::Prompted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FoodCategory {
    #[serde(rename = "Citrus Fruits")]
    CitrusFruits,
    #[serde(rename = "Berries & Other Fruits")]
    BerriesOtherFruits,
    #[serde(rename = "Dairy & Calcium-rich Foods")]
    DairyCalcium,
    #[serde(rename = "High-Fat Foods")]
    HighFatFoods,
    #[serde(rename = "Leafy Greens (Vitamin K)")]
    LeafyGreens,
    Alcohol,
    Caffeine,
    #[serde(rename = "Herbal Supplements & Teas")]
    HerbalSupplements,
    #[serde(rename = "Nuts & Seeds")]
    NutsSeeds,
    #[serde(rename = "Spices & Seasonings")]
    SpicesSeasonings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FoodDataSource {
    #[serde(rename = "Clinical Studies")]
    ClinicalStudies,
    #[serde(rename = "Pharmacokinetic Analysis")]
    PharmacokineticAnalysis,
    #[serde(rename = "FDA Warnings")]
    FdaWarnings,
    #[serde(rename = "Manufacturer Data")]
    ManufacturerData,
    #[serde(rename = "AI-Generated")]
    AiGenerated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FoodCategoryInteraction {
    pub category: FoodCategory,
    pub has_interaction: bool,
    pub severity: InteractionSeverity,
    /// Specific foods in this category, comma-separated.
    pub specific_foods: String,
    #[serde(default)]
    pub mechanism: Option<String>,
    #[serde(default)]
    pub timing_recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrugFoodInteractionDetails {
    pub medicine_name: String,
    pub overall_severity: InteractionSeverity,
    pub mechanism_of_interaction: String,
    pub clinical_effects: String,
    pub food_category_interactions: Vec<FoodCategoryInteraction>,
    pub management_recommendations: String,
    pub foods_to_avoid: String,
    pub foods_safe_to_consume: String,
    pub confidence_level: ConfidenceLevel,
    pub data_source_type: FoodDataSource,
    #[serde(default)]
    pub references: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FoodPatientSummary {
    pub simple_explanation: String,
    pub what_patient_should_do: String,
    pub foods_to_avoid_simple: String,
    pub meal_timing_guidance: String,
    pub warning_signs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrugFoodInteractionResult {
    #[serde(default)]
    pub interaction_details: Option<DrugFoodInteractionDetails>,
    pub technical_summary: String,
    #[serde(default)]
    pub patient_friendly_summary: Option<FoodPatientSummary>,
    pub data_availability: DataAvailability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugFoodQuery {
    medicine: String,
    diet_type: Option<String>,
    conditions: Option<String>,
    age: Option<u32>,
    specific_food: Option<String>,
}

impl DrugFoodQuery {
    pub fn new(
        medicine: &str, diet_type: Option<&str>, conditions: Option<&str>, age: Option<i64>,
        specific_food: Option<&str>,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            medicine: non_blank("medicine", medicine)?,
            diet_type: optional_text(diet_type),
            conditions: optional_text(conditions),
            age: check_age(age)?,
            specific_food: optional_text(specific_food),
        })
    }
}

impl CacheQuery for DrugFoodQuery {
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
        key.require("medicine", &self.medicine)?
            .optional(self.diet_type.as_deref())
            .optional(self.conditions.as_deref())
            .optional(self.age)
            .optional(self.specific_food.as_deref());
        Ok(())
    }
}

impl Prompted for DrugFoodQuery {
    const MODULE: &'static str = DRUG_FOOD_INTERACTION;
    type Output = DrugFoodInteractionResult;

    fn prompt(&self) -> String {
        let mut context = vec![format!("Analyzing food interactions for {}", self.medicine)];
        if let Some(food) = &self.specific_food {
            context.push(format!("Specific foods to check: {food}"));
        }
        if let Some(diet) = &self.diet_type {
            context.push(format!("Patient diet type: {diet}"));
        }
        if let Some(age) = self.age {
            context.push(format!("Patient age: {age} years"));
        }
        if let Some(conditions) = &self.conditions {
            context.push(format!("Patient conditions: {conditions}"));
        }

        format!("{} food and beverage interactions analysis. {}.", self.medicine, context.join(". "))
    }
}
