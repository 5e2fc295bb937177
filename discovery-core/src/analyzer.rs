//! analyzer.rs - The privacy-enforced analysis pipeline.
//!
//! `InterviewAnalyzer` sequences one request through
//! audit → redact → extract → validate and mediates the cache around it.
//! Redaction is unconditional: no code path hands unredacted text to the
//! extractor. Validation, when enabled, is fail-closed.
//!
//! The analyzer holds only immutable state after construction, so a single
//! instance can serve concurrent requests through `&self`.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::cache::{CacheKey, CacheStore};
use crate::config::Guidelines;
use crate::errors::{DiscoveryError, Result};
use crate::extraction::Extractor;
use crate::models::InsightRecord;
use crate::pii_log::content_hash;
use crate::prompt::build_system_prompt;
use crate::sanitizers::auditor::{run_audit, AuditLog};
use crate::sanitizers::redactor::redact;
use crate::sanitizers::validator::validate_no_pii;
use crate::transcript::{load_transcript, Transcript};
use crate::transcription::{transcribe_audio_file, Transcriber};

/// Per-request switches for the optional stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub audit: bool,
    pub validate: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            audit: true,
            validate: true,
        }
    }
}

/// How a request may use the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Serve from cache when possible, otherwise run live.
    #[default]
    Auto,
    /// Cache only; a miss is reported, never computed.
    Cached,
    /// Always run the pipeline.
    Live,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Auto => "auto",
            AnalysisMode::Cached => "cached",
            AnalysisMode::Live => "live",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(AnalysisMode::Auto),
            "cached" => Ok(AnalysisMode::Cached),
            "live" => Ok(AnalysisMode::Live),
            other => Err(DiscoveryError::UnknownInput(format!(
                "Unknown mode '{}'. Allowed: [auto, cached, live]",
                other
            ))),
        }
    }
}

/// Pipeline states. Each request moves strictly forward; a failure ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    Audited,
    Redacted,
    Extracted,
    Validated,
    Done,
}

impl PipelineStage {
    /// Label reported in `AnalysisResponse::steps`.
    pub fn step_label(&self) -> &'static str {
        match self {
            PipelineStage::Start => "Reading transcript",
            PipelineStage::Audited => "Auditing PII",
            PipelineStage::Redacted => "Redacting PII",
            PipelineStage::Extracted => "Extracting insights",
            PipelineStage::Validated => "Validating output",
            PipelineStage::Done => "Done",
        }
    }
}

const CACHED_STEPS: [&str; 3] = ["Loading cached insights", "Rendering", "Done"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub variant_id: String,
    #[serde(default)]
    pub mode: AnalysisMode,
}

impl AnalysisRequest {
    pub fn new(variant_id: impl Into<String>, mode: AnalysisMode) -> Self {
        Self {
            variant_id: variant_id.into(),
            mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub run_id: String,
    pub variant_id: String,
    pub cached: bool,
    pub steps: Vec<String>,
    pub insights: InsightRecord,
}

/// Drives analysis requests over shared, read-only collaborators.
pub struct InterviewAnalyzer {
    guidelines: Arc<Guidelines>,
    system_prompt: String,
    extractor: Extractor,
    cache: Arc<dyn CacheStore>,
    transcriber: Option<Arc<dyn Transcriber>>,
    audit_log: Option<AuditLog>,
}

impl fmt::Debug for InterviewAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterviewAnalyzer")
            .field("guideline_fingerprint", &self.guidelines.fingerprint)
            .field("extractor", &self.extractor)
            .field("transcriber", &self.transcriber.is_some())
            .field("audit_log", &self.audit_log)
            .finish()
    }
}

impl InterviewAnalyzer {
    /// Renders the system prompt once; fails only if the frameworks cannot be
    /// rendered.
    pub fn new(
        guidelines: Arc<Guidelines>,
        extractor: Extractor,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self> {
        let system_prompt = build_system_prompt(&guidelines.frameworks)?;
        Ok(Self {
            guidelines,
            system_prompt,
            extractor,
            cache,
            transcriber: None,
            audit_log: None,
        })
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Every audit run appends a record to `audit_log`; a failed append
    /// aborts the request.
    pub fn with_audit_log(mut self, audit_log: AuditLog) -> Self {
        self.audit_log = Some(audit_log);
        self
    }

    pub fn guidelines(&self) -> &Guidelines {
        &self.guidelines
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Runs the live pipeline over caller-supplied text. The cache is not
    /// consulted.
    pub async fn analyze(&self, text: &str, options: AnalyzeOptions) -> Result<InsightRecord> {
        let run_id = format!("adhoc-{}", &content_hash(text)[..12]);
        let (insights, _) = self.run_pipeline(text, &run_id, options).await?;
        Ok(insights)
    }

    pub async fn analyze_file(&self, path: &Path, options: AnalyzeOptions) -> Result<InsightRecord> {
        let text = load_transcript(path)?;
        self.analyze(&text, options).await
    }

    /// Transcribes `path`, optionally writes the transcript to
    /// `save_transcript`, then analyzes it.
    pub async fn analyze_audio_file(
        &self,
        path: &Path,
        language: Option<&str>,
        options: AnalyzeOptions,
        save_transcript: Option<&Path>,
    ) -> Result<InsightRecord> {
        let transcriber = self.transcriber.as_ref().ok_or_else(|| {
            DiscoveryError::Config("no transcription capability configured".to_string())
        })?;
        let text = transcribe_audio_file(transcriber.as_ref(), path, language).await?;
        if let Some(out) = save_transcript {
            tokio::fs::write(out, &text).await?;
            info!("Transcript saved to: {}", out.display());
        }
        self.analyze(&text, options).await
    }

    /// Serves a request for a named variant with default options.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let transcript = self.guidelines.variants.load(&request.variant_id)?;
        self.run_transcript(&transcript, request.mode, AnalyzeOptions::default())
            .await
    }

    /// Serves a request over a transcript, consulting the cache per `mode`.
    pub async fn run_transcript(
        &self,
        transcript: &Transcript,
        mode: AnalysisMode,
        options: AnalyzeOptions,
    ) -> Result<AnalysisResponse> {
        let key = CacheKey::fingerprint(
            &transcript.variant_id,
            &self.guidelines.fingerprint,
            &transcript.text,
        );
        let run_id = format!("{}-{}", transcript.variant_id, key);
        debug!("Request {} in {} mode.", run_id, mode);

        if mode != AnalysisMode::Live {
            match self.cache.get(&key).await {
                Ok(Some(entry)) => {
                    info!("Serving cached insights for {}.", run_id);
                    return Ok(AnalysisResponse {
                        run_id,
                        variant_id: transcript.variant_id.clone(),
                        cached: true,
                        steps: CACHED_STEPS.iter().map(|s| s.to_string()).collect(),
                        insights: entry.insights,
                    });
                }
                Ok(None) => debug!("Cache miss for {}.", run_id),
                Err(e) => warn!("Cache read failed for {}: {}", run_id, e),
            }

            if mode == AnalysisMode::Cached {
                return Err(DiscoveryError::NotCached {
                    variant_id: transcript.variant_id.clone(),
                    key: key.to_string(),
                });
            }
        }

        let (insights, stages) = self.run_pipeline(&transcript.text, &run_id, options).await?;

        // Cache hits skip validation, so only validated records may be stored.
        if !options.validate {
            debug!("Validation was skipped for {}; result not cached.", run_id);
        } else if let Err(e) = self.cache.put(&key, &insights).await {
            warn!("Failed writing cache for {} (non-fatal): {}", run_id, e);
        }

        Ok(AnalysisResponse {
            run_id,
            variant_id: transcript.variant_id.clone(),
            cached: false,
            steps: stages.iter().map(|s| s.step_label().to_string()).collect(),
            insights,
        })
    }

    async fn run_pipeline(
        &self,
        text: &str,
        run_id: &str,
        options: AnalyzeOptions,
    ) -> Result<(InsightRecord, Vec<PipelineStage>)> {
        let ruleset = self.guidelines.ruleset.as_ref();
        let mut stages = vec![PipelineStage::Start];

        if options.audit {
            let report = run_audit(text, ruleset, self.audit_log.as_ref(), run_id)?;
            debug!("[{}] audit found {} PII matches.", run_id, report.total());
            advance(&mut stages, PipelineStage::Audited, run_id);
        }

        let sanitized = redact(text, ruleset);
        advance(&mut stages, PipelineStage::Redacted, run_id);

        let insights = self.extractor.extract(&sanitized, &self.system_prompt).await?;
        advance(&mut stages, PipelineStage::Extracted, run_id);

        if options.validate {
            validate_no_pii(&insights, ruleset)?;
            advance(&mut stages, PipelineStage::Validated, run_id);
        }

        advance(&mut stages, PipelineStage::Done, run_id);
        info!("[{}] extracted {} findings.", run_id, insights.len());
        Ok((insights, stages))
    }
}

fn advance(stages: &mut Vec<PipelineStage>, next: PipelineStage, run_id: &str) {
    debug!("[{}] -> {:?}", run_id, next);
    stages.push(next);
}
