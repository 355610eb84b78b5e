//! Gemini `generateContent` request types.

use serde::Serialize;

/// A single model call, independent of the wire format.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub model: String,
    pub system_instruction: Option<String>,
    pub text: String,
    /// Ask the model to answer with a JSON document.
    pub json_output: bool,
    pub temperature: Option<f32>,
}

impl Prompt {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self { model: model.into(), system_instruction: None, text: text.into(), json_output: false, temperature: None }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Request body for `models/{model}:generateContent`.
///
/// Based on the Generative Language API reference:
/// https://ai.google.dev/api/generate-content
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'static str>,
}

impl From<&Prompt> for GenerateContentRequest {
    fn from(prompt: &Prompt) -> Self {
        let system_instruction = prompt
            .system_instruction
            .as_ref()
            .map(|text| Content { role: None, parts: vec![Part { text: text.clone() }] });

        let generation_config = (prompt.json_output || prompt.temperature.is_some()).then(|| GenerationConfig {
            temperature: prompt.temperature,
            response_mime_type: prompt.json_output.then_some("application/json"),
        });

        Self {
            contents: vec![Content { role: Some("user"), parts: vec![Part { text: prompt.text.clone() }] }],
            system_instruction,
            generation_config,
        }
    }
}
