//! Structured errors for the medkit server.

use medkit_client::{GenerateError, QueryError};
use medkit_core::cache::FetchError;
use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Errors raised by tool implementations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Rejected query parameters.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(#[from] QueryError),

    /// No module with this name.
    #[error("UNKNOWN_MODULE: {0}")]
    UnknownModule(String),

    /// The language model call failed or returned unusable output.
    #[error("GENERATION_FAILED: {0}")]
    GenerationFailed(#[from] GenerateError),

    /// The query could not be turned into a cache key.
    #[error(transparent)]
    Core(#[from] medkit_core::Error),
}

impl From<FetchError<GenerateError>> for ToolError {
    fn from(err: FetchError<GenerateError>) -> Self {
        match err {
            FetchError::Key(e) => ToolError::Core(e.into()),
            FetchError::Generator(e) => ToolError::GenerationFailed(e),
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        if let ToolError::Core(inner) = err {
            return inner.into();
        }

        let code = match &err {
            ToolError::InvalidInput(_) | ToolError::UnknownModule(_) => -32602,
            _ => -32000,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
