//! Query modules answered by a language model and cached per module.
//!
//! Each module pairs a validated query type with a structured response type.
//! Validation runs in the query constructors, before any key derivation or
//! I/O.

pub mod anatomy;
pub mod dictionary;
pub mod disease;
pub mod drug_food;
pub mod drug_interaction;
pub mod exam_questions;
pub mod test_info;

pub use anatomy::{AnatomyQuery, MedicalAnatomy};
pub use dictionary::{DictionaryQuery, MedicalTerm};
pub use disease::{DiseaseInfo, DiseaseQuery};
pub use drug_food::{DrugFoodInteractionResult, DrugFoodQuery};
pub use drug_interaction::{DrugDose, DrugInteractionQuery, DrugInteractionResult};
pub use exam_questions::{ExamQuery, ExamQuestions, ExamType};
pub use test_info::{MedicalTestInfo, MedicalTestQuery};

/// Oldest accepted patient age, in years.
pub const MAX_AGE: i64 = 150;

/// Rejected query input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("age must be between 0 and {MAX_AGE} years, got {age}")]
    AgeOutOfRange { age: i64 },

    #[error("unknown exam type '{given}'")]
    UnknownExamType { given: String },
}

pub(crate) fn non_blank(field: &'static str, value: &str) -> Result<String, QueryError> {
    let value = value.trim();
    if value.is_empty() { Err(QueryError::Empty { field }) } else { Ok(value.to_string()) }
}

/// Drop blank optional text.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub(crate) fn check_age(age: Option<i64>) -> Result<Option<u32>, QueryError> {
    match age {
        None => Ok(None),
        Some(age) if (0..=MAX_AGE).contains(&age) => Ok(Some(age as u32)),
        Some(age) => Err(QueryError::AgeOutOfRange { age }),
    }
}
