//! Gemini API client.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST {base_url}/models/{model}:generateContent`
//! - **Authentication**: `x-goog-api-key` header.
//! - **Output**: text of the first candidate. Structured output is requested
//!   with `responseMimeType: application/json`.
//! - **Failures**: 401/403 map to [`GeminiError::AuthError`], 429 to
//!   [`GeminiError::RateLimited`], other non-2xx statuses carry the API's
//!   error message.

pub mod error;
pub mod request;
pub mod response;

pub use error::GeminiError;
pub use request::{GenerateContentRequest, Prompt};
pub use response::GenerateContentResponse;

use async_trait::async_trait;
use medkit_core::AppConfig;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the Generative Language API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "medkit/0.1";

/// A text-generating model.
///
/// [`GeminiClient`] is the production implementation; tests substitute their own.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GeminiError>;
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GeminiError> {
        (**self).generate(prompt).await
    }
}

/// Stand-in used when no API key is configured. Every call fails with
/// [`GeminiError::MissingApiKey`], so cached answers stay reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredModel;

#[async_trait]
impl LanguageModel for UnconfiguredModel {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, GeminiError> {
        Err(GeminiError::MissingApiKey)
    }
}

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Build from application configuration.
    ///
    /// Fails with [`GeminiError::MissingApiKey`] when no key is configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeminiError> {
        let api_key = config.require_gemini_api_key().map_err(|_| GeminiError::MissingApiKey)?;
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: config.gemini_base_url.clone(),
            timeout: config.timeout(),
            ..Default::default()
        })
    }
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| GeminiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeminiError> {
        Self::new(GeminiConfig::from_app_config(config)?)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url.trim_end_matches('/'), model)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GeminiError> {
        let start = Instant::now();
        let body = GenerateContentRequest::from(prompt);

        tracing::debug!(model = %prompt.model, json = prompt.json_output, "calling Gemini");

        let http_response = self
            .http
            .post(self.endpoint(&prompt.model))
            .header("x-goog-api-key", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(model = %prompt.model, status = %status, "Gemini response status");

        if status == 401 || status == 403 {
            return Err(GeminiError::AuthError);
        }

        if status == 429 {
            return Err(GeminiError::RateLimited);
        }

        let bytes = http_response.bytes().await?;

        if status.is_client_error() || status.is_server_error() {
            let message = serde_json::from_slice::<response::ApiErrorBody>(&bytes)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(GeminiError::HttpError { status: status.as_u16(), message });
        }

        let api_response: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|e| GeminiError::Parse(e.to_string()))?;

        if let Some(usage) = api_response.usage_metadata {
            tracing::debug!(
                model = %prompt.model,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Gemini call completed"
            );
        }

        api_response.into_text()
    }
}
