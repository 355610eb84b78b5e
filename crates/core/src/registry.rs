//! Static table of the query modules this toolkit ships.

use serde::{Deserialize, Serialize};

/// Broad grouping used when listing modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Drug,
    Medical,
    Diagnostics,
}

/// Description of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleSpec {
    /// Module name, also used as the cache domain tag and store file name.
    pub name: &'static str,
    pub category: Category,
    /// Default model, overridable through `AppConfig::models`.
    pub model: &'static str,
    pub description: &'static str,
}

/// Model used for a module with no registry entry and no override.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub const DISEASE_INFO: &str = "disease_info";
pub const DRUG_DRUG_INTERACTION: &str = "drug_drug_interaction";
pub const DRUG_FOOD_INTERACTION: &str = "drug_food_interaction";
pub const MEDICAL_ANATOMY: &str = "medical_anatomy";
pub const MEDICAL_DICTIONARY: &str = "medical_dictionary";
pub const MEDICAL_PHYSICAL_EXAMS_QUESTIONS: &str = "medical_physical_exams_questions";
pub const MEDICAL_TEST_INFO: &str = "medical_test_info";

static MODULES: &[ModuleSpec] = &[
    ModuleSpec {
        name: DRUG_DRUG_INTERACTION,
        category: Category::Drug,
        model: "gemini-1.5-pro",
        description: "Analyze drug-drug interactions and provide clinical guidance",
    },
    ModuleSpec {
        name: DRUG_FOOD_INTERACTION,
        category: Category::Drug,
        model: DEFAULT_MODEL,
        description: "Analyze drug-food interactions and dietary guidance",
    },
    ModuleSpec {
        name: MEDICAL_DICTIONARY,
        category: Category::Medical,
        model: DEFAULT_MODEL,
        description: "Medical term definitions and explanations",
    },
    ModuleSpec {
        name: DISEASE_INFO,
        category: Category::Medical,
        model: "gemini-1.5-pro",
        description: "Comprehensive disease information including symptoms, diagnosis, and treatment",
    },
    ModuleSpec {
        name: MEDICAL_ANATOMY,
        category: Category::Medical,
        model: DEFAULT_MODEL,
        description: "Anatomical structures: location, morphology, supply, clinical significance and imaging",
    },
    ModuleSpec {
        name: MEDICAL_PHYSICAL_EXAMS_QUESTIONS,
        category: Category::Diagnostics,
        model: DEFAULT_MODEL,
        description: "Physical exam questions and protocols",
    },
    ModuleSpec {
        name: MEDICAL_TEST_INFO,
        category: Category::Diagnostics,
        model: DEFAULT_MODEL,
        description: "Medical tests: preparation, procedure, reference ranges and interpretation",
    },
];

pub fn modules() -> &'static [ModuleSpec] {
    MODULES
}

pub fn lookup(name: &str) -> Option<&'static ModuleSpec> {
    MODULES.iter().find(|spec| spec.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    MODULES.iter().map(|spec| spec.name)
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static ModuleSpec> {
    MODULES.iter().filter(move |spec| spec.category == category)
}
