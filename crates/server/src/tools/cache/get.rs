//! cache_get tool implementation.
//!
//! Retrieves a cached answer by module and key.

use medkit_core::cache::CacheKey;
use medkit_core::Error;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::Services;
use crate::tools::to_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Module whose store to read, e.g. "medical_dictionary".
    pub module: String,

    /// The 64-character key returned alongside a tool answer.
    pub key: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize)]
pub struct CacheGetOutput {
    pub module: String,
    pub key: CacheKey,
    /// The stored answer, as JSON.
    pub value: serde_json::Value,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(services: &Services, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let key = CacheKey::parse(&params.key)?;
    let cache = services.module(&params.module)?;

    let bytes = cache
        .require_storage()?
        .get(cache.domain, key.as_str())
        .await?
        .ok_or_else(|| Error::CacheMiss(key.to_string()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(Error::from)?;

    to_result(&CacheGetOutput { module: params.module, key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::cache::testing::{services, shared_store_services};
    use crate::tools::dictionary::{MedicalTermParams, medical_term_impl};
    use crate::tools::testing::output;
    use crate::tools::CacheFlags;
    use rmcp::model::ErrorCode;

    #[tokio::test]
    async fn test_get_missing() {
        let dir = tempfile::tempdir().unwrap();
        let (services, _) = services(&dir).await;

        let params = CacheGetParams { module: "medical_dictionary".into(), key: "a".repeat(64) };
        let err = get_impl(&services, params).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32001));
    }

    #[tokio::test]
    async fn test_get_found() {
        let dir = tempfile::tempdir().unwrap();
        let (services, _) = services(&dir).await;

        let params = MedicalTermParams { term: "gout".into(), cache: CacheFlags::default() };
        let answered = output(&medical_term_impl(&services.dictionary, params).await.unwrap());
        let key = answered["key"].as_str().unwrap().to_uppercase();

        let params = CacheGetParams { module: "medical_dictionary".into(), key };
        let out = output(&get_impl(&services, params).await.unwrap());
        assert_eq!(out["value"]["term"], "Gout");
        assert_eq!(out["key"], answered["key"]);
    }

    #[tokio::test]
    async fn test_get_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let (services, _) = services(&dir).await;

        let params = CacheGetParams { module: "medical_dictionary".into(), key: "not-a-key".into() };
        assert_eq!(get_impl(&services, params).await.unwrap_err().code, ErrorCode(-32602));

        let params = CacheGetParams { module: "horoscopes".into(), key: "a".repeat(64) };
        let err = get_impl(&services, params).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32602));
        assert!(err.message.contains("horoscopes"));
    }

    #[tokio::test]
    async fn test_get_in_shared_store_stays_in_module() {
        let dir = tempfile::tempdir().unwrap();
        let (services, _) = shared_store_services(&dir).await;

        let params = MedicalTermParams { term: "gout".into(), cache: CacheFlags::default() };
        let answered = output(&medical_term_impl(&services.dictionary, params).await.unwrap());
        let key = answered["key"].as_str().unwrap().to_string();

        let params = CacheGetParams { module: "disease_info".into(), key: key.clone() };
        assert_eq!(get_impl(&services, params).await.unwrap_err().code, ErrorCode(-32001));

        let params = CacheGetParams { module: "medical_dictionary".into(), key };
        let out = output(&get_impl(&services, params).await.unwrap());
        assert_eq!(out["value"]["term"], "Gout");
    }
}
