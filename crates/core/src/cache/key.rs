//! Deterministic cache key derivation.
//!
//! A key is the SHA-256 of the domain tag followed by every identifying query
//! field. Fields are normalized (trimmed, inner whitespace collapsed,
//! lowercased) and length-prefixed before hashing, so neither letter case nor
//! separator characters inside a value can make two queries collide.

use std::fmt;

use sha2::{Digest, Sha256};

/// Marker hashed in place of an omitted optional field.
///
/// Present fields always start with their decimal length, so this can never
/// equal an encoded value.
const ABSENT: &str = "-";

/// Errors raised while deriving a cache key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("domain tag must not be empty")]
    EmptyDomain,

    #[error("required field '{field}' is empty")]
    MissingField { field: &'static str },
}

/// A derived cache key: 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Parse a key received from outside, e.g. through a tool call.
    pub fn parse(raw: &str) -> Result<Self, crate::Error> {
        let raw = raw.trim();
        if raw.len() != 64 || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(crate::Error::InvalidKey);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a single field value: trim, collapse whitespace runs, case-fold.
pub fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn encode(value: &str) -> String {
    format!("{}:{}", value.len(), value)
}

/// Incrementally collects the identifying fields of a query.
///
/// The domain tag is always the first field, so the same parameters asked of
/// two different modules never share an entry.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    fields: Vec<String>,
}

impl KeyBuilder {
    pub fn new(domain: &str) -> Result<Self, KeyError> {
        let domain = normalize(domain);
        if domain.is_empty() {
            return Err(KeyError::EmptyDomain);
        }
        Ok(Self { fields: vec![encode(&domain)] })
    }

    /// Add a field that must be present and non-blank.
    pub fn require(&mut self, field: &'static str, value: &str) -> Result<&mut Self, KeyError> {
        let value = normalize(value);
        if value.is_empty() {
            return Err(KeyError::MissingField { field });
        }
        self.fields.push(encode(&value));
        Ok(self)
    }

    /// Add a field that may be omitted. Blank strings count as omitted.
    pub fn optional<T: ToString>(&mut self, value: Option<T>) -> &mut Self {
        let value = value.map(|v| normalize(&v.to_string())).filter(|v| !v.is_empty());
        match value {
            Some(v) => self.fields.push(encode(&v)),
            None => self.fields.push(ABSENT.to_string()),
        }
        self
    }

    /// Add a set of values whose order carries no meaning.
    ///
    /// Every member must be non-blank.
    pub fn unordered<I, S>(&mut self, field: &'static str, values: I) -> Result<&mut Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members = values
            .into_iter()
            .map(|v| normalize(v.as_ref()))
            .collect::<Vec<_>>();
        if members.is_empty() || members.iter().any(String::is_empty) {
            return Err(KeyError::MissingField { field });
        }
        members.sort();
        let joined: String = members.iter().map(|m| encode(m)).collect();
        self.fields.push(format!("{}#{}", members.len(), joined));
        Ok(self)
    }

    pub fn finish(&self) -> CacheKey {
        let mut hasher = Sha256::new();
        for field in &self.fields {
            hasher.update(field.as_bytes());
            hasher.update(b"\n");
        }
        CacheKey(hex::encode(hasher.finalize()))
    }
}

/// A query whose identifying fields can be turned into a cache key.
pub trait CacheQuery {
    /// Append every field that affects the generated content, in a fixed order.
    fn key_fields(&self, key: &mut KeyBuilder) -> Result<(), KeyError>;
}

/// Derive the key for `query` under `domain`.
pub fn derive_key<Q: CacheQuery + ?Sized>(domain: &str, query: &Q) -> Result<CacheKey, KeyError> {
    let mut builder = KeyBuilder::new(domain)?;
    query.key_fields(&mut builder)?;
    Ok(builder.finish())
}
