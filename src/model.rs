// Core structs: connection records, products, match results and error types
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the brand connection export: a primary brand and the
/// `;`-separated aliases tied to it.
#[derive(Debug, Clone, Deserialize)]
pub struct BrandConnectionRecord {
    #[serde(alias = "manufacturer_p1")]
    pub primary_brand: String,
    #[serde(alias = "manufacturers_p2")]
    pub related_brands: String,
}

impl BrandConnectionRecord {
    pub fn new(primary_brand: impl Into<String>, related_brands: impl Into<String>) -> Self {
        Self {
            primary_brand: primary_brand.into(),
            related_brands: related_brands.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub title: Option<String>,
    pub source_id: String,
    #[serde(default)]
    pub already_mapped: bool,
}

impl ProductRecord {
    pub fn new(source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            source_id: source_id.into(),
            already_mapped: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_brands: Vec<String>,
    pub canonical_brand: Option<String>,
}

/// A match result tagged with the product it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRecord {
    pub source_id: String,
    pub result: MatchResult,
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid connection input: {0}")]
    InvalidInput(String),

    #[error("invalid product record {source_id}: {reason}")]
    InvalidRecord { source_id: String, reason: String },

    #[error("brand pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid diacritic rule: {0}")]
    Diacritic(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
