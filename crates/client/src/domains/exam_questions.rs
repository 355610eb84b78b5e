//! Physical examination question sets.

use std::fmt;
use std::str::FromStr;

use medkit_core::cache::{CacheQuery, KeyBuilder, KeyError};
use medkit_core::registry::MEDICAL_PHYSICAL_EXAMS_QUESTIONS;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{QueryError, check_age, optional_text};
use crate::generator::Prompted;

/// Exams the generator knows how to ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamType {
    Skin,
    Eye,
    Respiratory,
    Cardiovascular,
    Abdominal,
    Neurological,
    Musculoskeletal,
    Gynecological,
    Obstetric,
    Genitourinary,
    Endocrine,
    InfectiousDisease,
    MentalHealth,
}

impl ExamType {
    pub const ALL: [ExamType; 13] = [
        ExamType::Skin,
        ExamType::Eye,
        ExamType::Respiratory,
        ExamType::Cardiovascular,
        ExamType::Abdominal,
        ExamType::Neurological,
        ExamType::Musculoskeletal,
        ExamType::Gynecological,
        ExamType::Obstetric,
        ExamType::Genitourinary,
        ExamType::Endocrine,
        ExamType::InfectiousDisease,
        ExamType::MentalHealth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExamType::Skin => "Skin Exam",
            ExamType::Eye => "Eye Exam",
            ExamType::Respiratory => "Respiratory Exam",
            ExamType::Cardiovascular => "Cardiovascular Exam",
            ExamType::Abdominal => "Abdominal Exam",
            ExamType::Neurological => "Neurological Exam",
            ExamType::Musculoskeletal => "Musculoskeletal Exam",
            ExamType::Gynecological => "Gynecological Exam",
            ExamType::Obstetric => "Obstetric Exam",
            ExamType::Genitourinary => "Genitourinary Exam",
            ExamType::Endocrine => "Endocrine Exam",
            ExamType::InfectiousDisease => "Infectious Disease Assessment",
            ExamType::MentalHealth => "Mental Health Assessment",
        }
    }

    fn reproductive_relevance(self) -> bool {
        matches!(
            self,
            ExamType::Skin
                | ExamType::Eye
                | ExamType::Gynecological
                | ExamType::Obstetric
                | ExamType::Genitourinary
                | ExamType::InfectiousDisease
                | ExamType::Endocrine
        )
    }

    fn stress_relevance(self) -> bool {
        matches!(
            self,
            ExamType::Skin
                | ExamType::Eye
                | ExamType::Abdominal
                | ExamType::Respiratory
                | ExamType::Cardiovascular
                | ExamType::Neurological
                | ExamType::Musculoskeletal
                | ExamType::MentalHealth
        )
    }

    fn focus_areas(self) -> &'static [&'static str] {
        match self {
            ExamType::Skin => &[
                "face and acne distribution patterns",
                "intertriginous areas (folds)",
                "extremities and nails",
                "scalp and hairline",
            ],
            ExamType::Respiratory => &[
                "upper lobes bilaterally",
                "lower lobes bilaterally",
                "breath sound distribution and character",
                "accessory muscle use",
            ],
            ExamType::Cardiovascular => &[
                "precordium and point of maximal impulse",
                "murmur location and radiation",
                "peripheral pulses bilaterally",
                "jugular venous pressure",
            ],
            ExamType::Abdominal => &[
                "right upper quadrant",
                "left upper quadrant",
                "right lower quadrant",
                "left lower quadrant",
                "periumbilical region",
            ],
            ExamType::Neurological => &[
                "cranial nerve distributions",
                "motor strength by extremity",
                "sensory levels and dermatomes",
                "reflex asymmetries",
            ],
            ExamType::Musculoskeletal => &[
                "bilateral joint comparison",
                "range of motion limitations",
                "muscle atrophy or hypertrophy",
                "joint swelling and warmth",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExamType {
    type Err = QueryError;

    /// Case-insensitive; the trailing "Exam" may be omitted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if wanted.is_empty() {
            return Err(QueryError::Empty { field: "exam_type" });
        }
        ExamType::ALL
            .into_iter()
            .find(|exam| {
                let name = exam.name().to_lowercase();
                name == wanted || name.strip_suffix(" exam") == Some(wanted.as_str())
            })
            .ok_or_else(|| QueryError::UnknownExamType { given: s.trim().to_string() })
    }
}

/// Questions grouped by examination technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExamQuestions {
    pub exam_type: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    pub inspection_questions: Vec<String>,
    pub palpation_questions: Vec<String>,
    /// Empty when percussion does not apply.
    pub percussion_questions: Vec<String>,
    /// Empty when auscultation does not apply.
    pub auscultation_questions: Vec<String>,
    pub verbal_assessment_questions: Vec<String>,
    pub medical_history_questions: Vec<String>,
    pub lifestyle_questions: Vec<String>,
    pub family_history_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamQuery {
    exam_type: ExamType,
    age: Option<u32>,
    gender: Option<String>,
}

impl ExamQuery {
    pub fn new(exam_type: &str, age: Option<i64>, gender: Option<&str>) -> Result<Self, QueryError> {
        Ok(Self { exam_type: exam_type.parse()?, age: check_age(age)?, gender: optional_text(gender) })
    }

    fn gender_is(&self, options: &[&str]) -> bool {
        self.gender
            .as_deref()
            .is_some_and(|g| options.iter().any(|o| g.eq_ignore_ascii_case(o)))
    }

    fn patient_context(&self) -> String {
        if self.age.is_none() && self.gender.is_none() {
            return String::new();
        }

        let mut context = String::from("\n\nPATIENT CONTEXT:\n");
        if let Some(age) = self.age {
            context.push_str(&format!("- Age: {age} years old\n"));
            if age < 18 {
                context.push_str("- Pediatric patient: consider developmental stage\n");
            } else if age >= 65 {
                context.push_str("- Elderly patient: consider age-related changes and geriatric conditions\n");
            }
        }
        if let Some(gender) = &self.gender {
            context.push_str(&format!("- Gender: {gender}\n"));
        }
        context.push_str("- Keep questions appropriate and sensitive to the patient's age and gender\n");
        context
    }

    fn exam_considerations(&self) -> String {
        let mut out = String::new();

        let female = self.gender_is(&["female", "woman"]);
        let male = self.gender_is(&["male", "man"]);
        if self.exam_type.reproductive_relevance() && (female || male) {
            out.push_str("\nREPRODUCTIVE/HORMONAL HEALTH CONSIDERATIONS:\n");
            if female {
                out.push_str("- Ask about menstrual cycle regularity and its relation to presenting symptoms\n");
                out.push_str("- Ask about pregnancy status, pregnancy plans, and breastfeeding\n");
                out.push_str("- Consider hormonal contraceptives or hormone replacement therapy\n");
            } else {
                out.push_str("- Ask about erectile function, libido, and changes in sexual health\n");
                out.push_str("- Consider testosterone levels and hormone-related conditions\n");
            }
        }

        if self.exam_type.stress_relevance() {
            out.push_str("\nSTRESS AND PSYCHOSOCIAL FACTORS:\n");
            out.push_str("- Ask about recent stressors, sleep quality, and their effect on symptoms\n");
        }

        let areas = self.exam_type.focus_areas();
        if !areas.is_empty() {
            out.push_str(&format!("\nEXAM-SPECIFIC FOCUS AREAS FOR {}:\n", self.exam_type.name().to_uppercase()));
            for area in areas {
                out.push_str(&format!("- {area}\n"));
            }
        }
        out
    }
}

impl CacheQuery for ExamQuery {
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError> {
        key.require("exam_type", self.exam_type.name())?
            .optional(self.age)
            .optional(self.gender.as_deref());
        Ok(())
    }
}

impl Prompted for ExamQuery {
    const MODULE: &'static str = MEDICAL_PHYSICAL_EXAMS_QUESTIONS;
    type Output = ExamQuestions;

    fn prompt(&self) -> String {
        format!(
            "Generate comprehensive physical examination questions for: {exam}{patient}{considerations}\n\
             Create detailed, clinically relevant questions organized by examination technique: \
             inspection (4-6), palpation (4-6), percussion (3-4, empty if not applicable), \
             auscultation (4-6, empty if not applicable), verbal assessment (5-6), medical history (4-5), \
             lifestyle (4-5) and family history (3-4). Number each question as \"Q1: ...\", \"Q2: ...\".\n\
             Questions must be evidence-based, clear to medical students and clinicians, \
             specific to the {exam} and practical in clinical settings.",
            exam = self.exam_type.name(),
            patient = self.patient_context(),
            considerations = self.exam_considerations(),
        )
    }
}
