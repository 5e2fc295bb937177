// discovery-core/src/lib.rs
//! # Discovery Core Library
//!
//! `discovery-core` turns interview transcripts into structured product
//! insights while keeping personally identifiable information away from the
//! extraction service and out of the returned records.
//!
//! Every analysis runs the same pipeline:
//!
//! 1. **Audit** (optional): count PII matches per category and log the summary.
//! 2. **Redact** (always): replace every match with its category token.
//! 3. **Extract**: hand only the redacted text to the extraction capability.
//! 4. **Validate** (optional, fail-closed): block the record if email, phone
//!    or employee-id patterns appear in the output.
//!
//! Results are cached under a fingerprint of the variant, the guidelines
//! document and the transcript text.
//!
//! ## Modules
//!
//! * `config`: Loads the guidelines YAML (frameworks, privacy rules, variants).
//! * `rules`: PII categories and the immutable, compiled `RuleSet`.
//! * `sanitizers`: Rule compilation plus the redactor, auditor and validator.
//! * `models`: The `InsightRecord` returned by extraction.
//! * `transcript`: Transcripts and the named-variant catalog.
//! * `cache`: Cache keys, the `CacheStore` trait and the file-backed store.
//! * `extraction`: Blocking and async extractor traits and the OpenAI client.
//! * `transcription`: The speech-to-text boundary and the Whisper client.
//! * `prompt`: Renders the extraction system prompt from the frameworks.
//! * `export`: Tab-separated output for whiteboard tools.
//! * `analyzer`: The `InterviewAnalyzer` orchestrator.
//!
//! ## Usage Example
//!
//! ```rust
//! use discovery_core::{audit, redact, Guidelines, PiiCategory};
//!
//! fn main() -> discovery_core::Result<()> {
//!     let guidelines = Guidelines::load_default()?;
//!     let text = "Contact John Doe at john@example.com or 555-123-4567";
//!
//!     let report = audit(text, &guidelines.ruleset);
//!     assert_eq!(report.count(PiiCategory::Email), 1);
//!     assert_eq!(report.count(PiiCategory::Phone), 1);
//!
//!     let sanitized = redact(text, &guidelines.ruleset);
//!     assert!(!sanitized.contains("john@example.com"));
//!     assert!(!sanitized.contains("555-123-4567"));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`DiscoveryError`]. Cache failures are the only
//! kind the analyzer absorbs; a PII validation failure is reported as
//! [`DiscoveryError::PiiValidation`] and the record is discarded.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod errors;
pub mod export;
pub mod extraction;
pub mod models;
pub mod pii_log;
pub mod prompt;
pub mod rules;
pub mod sanitizers;
pub mod transcript;
pub mod transcription;

/// Re-exports the error type and result alias.
pub use errors::{DiscoveryError, Result};

/// Re-exports guideline loading.
pub use config::{Guidelines, GuidelinesFile, PiiRemovalConfig, DEFAULT_GUIDELINES_YAML};

pub use rules::{PatternSet, PiiCategory, PrivacyRule, RuleSet};

/// Re-exports the three PII operations and their outputs.
pub use sanitizers::auditor::{audit, run_audit, AuditLog, AuditRecord, AuditReport};
pub use sanitizers::compiler::{CompiledRule, MAX_PATTERN_LENGTH};
pub use sanitizers::redactor::redact;
pub use sanitizers::validator::{find_output_pii, validate_no_pii, ValidationOutcome};

pub use models::InsightRecord;
pub use transcript::{load_transcript, Transcript, VariantCatalog};

/// Re-exports caching primitives.
pub use cache::{CacheEntry, CacheKey, CacheStore, FileCacheStore};

/// Re-exports the external capability boundaries.
pub use extraction::{AsyncExtractor, BlockingExtractor, Extractor, OpenAiExtractor, ReplayExtractor};
pub use transcription::{transcribe_audio_file, Transcriber, WhisperTranscriber, SUPPORTED_AUDIO_FORMATS};

pub use analyzer::{
    AnalysisMode, AnalysisRequest, AnalysisResponse, AnalyzeOptions, InterviewAnalyzer,
    PipelineStage,
};
pub use export::to_mural_text_blocks;
pub use prompt::build_system_prompt;
