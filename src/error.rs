//! Error types for the maturity engine.
//!
//! Scoring and prioritization never fail; errors only come from building a
//! catalog, loading configuration, or the optional generation endpoint.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for engine construction.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problems found while validating catalog data.
#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate category id '{0}'")]
    DuplicateCategory(String),

    #[error("duplicate question id '{0}'")]
    DuplicateQuestion(String),

    #[error("question '{question}' references unknown category '{category}'")]
    UnknownCategory { question: String, category: String },

    #[error("{kind} '{id}' has non-positive weight {weight}")]
    InvalidWeight {
        kind: &'static str,
        id: String,
        weight: f64,
    },

    #[error("failed to decode catalog: {0}")]
    Decode(String),
}

/// Failures of the external generation path.
///
/// These never reach callers of `generate_recommendations`; they select the
/// rule-based fallback and are logged.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("no generation API key configured")]
    MissingCredential,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("response has no message content")]
    EmptyContent,

    #[error("no JSON array found in response")]
    NoJsonArray,

    #[error("malformed recommendation JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response contained no recommendations")]
    NoRecommendations,
}
