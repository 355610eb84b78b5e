//! Gemini `generateContent` response types.

use serde::Deserialize;

use super::GeminiError;

/// Raw response from `generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn into_text(self) -> Result<String, GeminiError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::Blocked(reason));
        }

        let candidate = self.candidates.into_iter().next().ok_or(GeminiError::EmptyResponse)?;
        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(GeminiError::Blocked("SAFETY".into()));
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() { Err(GeminiError::EmptyResponse) } else { Ok(text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}],
                "usageMetadata":{"promptTokenCount":12,"candidatesTokenCount":4,"totalTokenCount":16}}"#,
        );
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 12);
        assert_eq!(response.into_text().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_blocked_prompt() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert!(matches!(response.into_text(), Err(GeminiError::Blocked(reason)) if reason == "SAFETY"));
    }

    #[test]
    fn test_empty_candidates() {
        assert!(matches!(parse(r#"{"candidates":[]}"#).into_text(), Err(GeminiError::EmptyResponse)));
        assert!(matches!(
            parse(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).into_text(),
            Err(GeminiError::EmptyResponse)
        ));
    }
}
