//! `analyze`: run the pipeline over one transcript or audio file.

use anyhow::{Context, Result};
use discovery_core::{
    AnalyzeOptions, AuditLog, FileCacheStore, InterviewAnalyzer, WhisperTranscriber,
    to_mural_text_blocks,
};
use log::info;
use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::AnalyzeCommand;
use crate::commands::{build_extractor, load_guidelines, require_api_key};
use crate::ui::output_format::{success_msg, warn_msg};
use crate::ui::report::{print_insights, print_mural_export};

pub async fn run_analyze(cmd: &AnalyzeCommand) -> Result<()> {
    info!("Starting analyze operation.");
    let guidelines = Arc::new(load_guidelines(cmd.config.as_deref())?);
    let extractor = build_extractor(&cmd.extraction)?;

    // Ad-hoc analysis never touches the cache. The store is created lazily,
    // so nothing is written to the cache directory here.
    let mut analyzer =
        InterviewAnalyzer::new(guidelines, extractor, Arc::new(FileCacheStore::from_env()))?;
    if let Some(path) = &cmd.audit_log {
        analyzer = analyzer.with_audit_log(AuditLog::new(path));
    }

    let options = AnalyzeOptions {
        audit: !cmd.no_audit,
        validate: !cmd.no_validate,
    };
    if cmd.no_validate {
        warn_msg("Output validation is disabled; PII in the result will not be blocked.");
    }

    let insights = if cmd.audio {
        let mut whisper = WhisperTranscriber::new(require_api_key(&cmd.extraction)?);
        if let Some(url) = &cmd.extraction.base_url {
            whisper = whisper.with_base_url(url.as_str());
        }
        analyzer
            .with_transcriber(Arc::new(whisper))
            .analyze_audio_file(
                &cmd.input,
                cmd.language.as_deref(),
                options,
                cmd.save_transcript.as_deref(),
            )
            .await?
    } else {
        analyzer.analyze_file(&cmd.input, options).await?
    };

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.mural {
        print_mural_export(&to_mural_text_blocks(&insights), &mut writer)?;
    } else {
        print_insights(&insights, &mut writer)?;
    }
    writer.flush()?;

    if let Some(path) = &cmd.output {
        let json = serde_json::to_string_pretty(&insights)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        success_msg(format!("Insights written to {}", path.display()));
    }

    info!("Analyze operation completed with {} findings.", insights.len());
    Ok(())
}
