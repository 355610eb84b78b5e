//! Client code for medkit.
//!
//! This crate provides the Gemini API client, schema-driven generation, and
//! the query modules served by the MCP server.

pub mod domains;
pub mod gemini;
pub mod generator;

pub use domains::QueryError;
pub use gemini::{GeminiClient, GeminiConfig, GeminiError, LanguageModel, Prompt, UnconfiguredModel};
pub use generator::{DomainService, GenerateError, Prompted, SchemaGenerator, open_service};
