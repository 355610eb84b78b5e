//! Medical dictionary entries.

use medkit_core::cache::{CacheQuery, KeyBuilder, KeyError};
use medkit_core::registry::MEDICAL_DICTIONARY;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{QueryError, non_blank};
use crate::generator::Prompted;

const SYSTEM_INSTRUCTION: &str = "You are an expert medical lexicographer. Provide accurate, evidence-based medical \
     information aligned with current medical guidelines and best practices.";

/// A dictionary entry in the usual medical dictionary layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MedicalTerm {
    /// Medical term name.
    pub term: String,
    /// Alternative name or common synonym.
    #[serde(default)]
    pub alternative_name: Option<String>,
    /// Concise definition (1-2 sentences, max 30 words).
    pub definition: String,
    /// How it works, when it is used and key details (2-3 sentences).
    pub explanation: String,
    /// Contraindications, precautions, or age restrictions if applicable.
    #[serde(default)]
    pub contraindications: Option<String>,
    /// One of: Disease, Anatomy, Procedure, Medication, Symptom, Sign, Treatment,
    /// Physiology, Clinical, Neurology.
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryQuery {
    term: String,
}

impl DictionaryQuery {
    pub fn new(term: &str) -> Result<Self, QueryError> {
        Ok(Self { term: non_blank("term", term)? })
    }
}

impl CacheQuery for DictionaryQuery {
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
        key.require("term", &self.term)?;
        Ok(())
    }
}

impl Prompted for DictionaryQuery {
    const MODULE: &'static str = MEDICAL_DICTIONARY;
    type Output = MedicalTerm;

    fn prompt(&self) -> String {
        format!("Generate a medical dictionary entry for: {}", self.term)
    }

    fn system_instruction(&self) -> Option<&'static str> {
        Some(SYSTEM_INSTRUCTION)
    }
}
