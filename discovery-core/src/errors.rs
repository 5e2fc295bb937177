//! errors.rs - Error taxonomy for the discovery-core library.
//!
//! Each variant maps to one failure class of the analysis pipeline so that
//! callers can tell configuration problems, bad input, transient extraction
//! failures and policy blocks apart without string matching.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

use crate::rules::PiiCategory;

/// All error kinds surfaced by `discovery-core`.
///
/// `CacheIo` is the only kind the analyzer absorbs on its own; every other
/// variant is returned to the caller unchanged.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiscoveryError {
    /// Missing or malformed guideline configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown variant or missing source file. Not retryable.
    #[error("Unknown input: {0}")]
    UnknownInput(String),

    /// The PII audit could not complete; the request is aborted.
    #[error("PII audit failed: {0}")]
    Audit(String),

    /// The extraction capability failed or returned an invalid payload.
    #[error("Extraction failed: {0}")]
    Extraction(#[source] anyhow::Error),

    /// PII was found in extracted output. The record is never returned.
    #[error("PII VALIDATION FAILED - output blocked for compliance ({})", format_categories(.0))]
    PiiValidation(Vec<PiiCategory>),

    /// Read or write failure against the cache store.
    #[error("Cache I/O error: {0}")]
    CacheIo(String),

    /// A cache-only request found no entry for its key.
    #[error("No cached insights available for variant '{variant_id}' (key {key})")]
    NotCached { variant_id: String, key: String },

    /// The transcription capability rejected the input or failed.
    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

impl DiscoveryError {
    /// True for the fail-closed PII block, which front ends report differently
    /// from operational errors.
    pub fn is_policy_block(&self) -> bool {
        matches!(self, DiscoveryError::PiiValidation(_))
    }
}

fn format_categories(categories: &[PiiCategory]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias used across the crate.
pub type Result<T, E = DiscoveryError> = std::result::Result<T, E>;
