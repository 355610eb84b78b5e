//! Schema-driven generation on top of a [`LanguageModel`].
//!
//! A query type describes its prompt and its response type. The generator
//! appends the response's JSON schema to the prompt, asks the model for JSON,
//! and parses the answer back into the response type.

use std::marker::PhantomData;
use std::sync::LazyLock;

use async_trait::async_trait;
use medkit_core::cache::{CacheQuery, CachedAccessor, Generator};
use medkit_core::{AppConfig, CacheConfig, registry};
use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::gemini::{GeminiError, LanguageModel, Prompt};

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n?(.*?)\s*```\s*$").expect("fence pattern is valid"));

/// A query that can be answered by a language model.
pub trait Prompted: CacheQuery + Send + Sync {
    /// Module name. Doubles as the cache domain tag.
    const MODULE: &'static str;

    type Output: Serialize + DeserializeOwned + JsonSchema + Send + Sync;

    fn prompt(&self) -> String;

    fn system_instruction(&self) -> Option<&'static str> {
        None
    }
}

/// Errors from a schema-driven generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Model(#[from] GeminiError),

    #[error("model returned invalid JSON: {0}")]
    InvalidJson(String),
}

/// [`Generator`] that answers `Q` by prompting `M`.
pub struct SchemaGenerator<Q, M> {
    model: M,
    model_name: String,
    schema: String,
    _query: PhantomData<fn(&Q)>,
}

impl<Q: Prompted, M: LanguageModel> SchemaGenerator<Q, M> {
    pub fn new(model: M, model_name: impl Into<String>) -> Self {
        let schema = schemars::schema_for!(<Q as Prompted>::Output);
        let schema = serde_json::to_string_pretty(&schema).unwrap_or_default();
        Self { model, model_name: model_name.into(), schema, _query: PhantomData }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_prompt(&self, query: &Q) -> Prompt {
        let text = format!(
            "{}\n\nRespond with a single JSON object that conforms to this JSON schema:\n{}",
            query.prompt(),
            self.schema
        );
        let prompt = Prompt::new(self.model_name.clone(), text).json();
        match query.system_instruction() {
            Some(instruction) => prompt.with_system_instruction(instruction),
            None => prompt,
        }
    }
}

#[async_trait]
impl<Q, M> Generator for SchemaGenerator<Q, M>
where
    Q: Prompted + 'static,
    M: LanguageModel,
{
    type Query = Q;
    type Output = Q::Output;
    type Error = GenerateError;

    async fn generate(&self, query: &Q) -> Result<Q::Output, GenerateError> {
        let prompt = self.build_prompt(query);
        tracing::info!(module = Q::MODULE, model = %self.model_name, "generating");

        let text = self.model.generate(&prompt).await?;
        parse_json(&text)
    }
}

/// Parse model output, tolerating a surrounding Markdown code fence.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, GenerateError> {
    let body = CODE_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text.trim(), |m| m.as_str());
    serde_json::from_str(body).map_err(|e| GenerateError::InvalidJson(e.to_string()))
}

/// Cached service for one query module.
pub type DomainService<Q, M> = CachedAccessor<SchemaGenerator<Q, M>>;

/// Open the cached service for `Q`, using the configured model and cache settings.
pub async fn open_service<Q, M>(config: &AppConfig, model: M) -> DomainService<Q, M>
where
    Q: Prompted + 'static,
    M: LanguageModel,
{
    let model_name = config.model_for(Q::MODULE).unwrap_or_else(|| registry::DEFAULT_MODEL.to_string());
    let cache: CacheConfig = config.cache_config(Q::MODULE);
    CachedAccessor::open(Q::MODULE, cache, SchemaGenerator::new(model, model_name)).await
}
