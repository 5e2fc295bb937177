//! Speech-to-text boundary and the Whisper client behind it.

use anyhow::{bail, Context};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;

use crate::errors::{DiscoveryError, Result};
use crate::extraction::openai::DEFAULT_BASE_URL;

pub const SUPPORTED_AUDIO_FORMATS: &[&str] = &["m4a", "mp3", "wav", "mp4", "mpeg", "mpga", "webm"];

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        language: Option<&str>,
    ) -> anyhow::Result<String>;
}

/// Checks the file, reads it and hands the bytes to `transcriber`.
///
/// A missing file is `UnknownInput`; an unsupported extension or a failed
/// transcription is `Transcription`.
pub async fn transcribe_audio_file(
    transcriber: &dyn Transcriber,
    path: &Path,
    language: Option<&str>,
) -> Result<String> {
    if !path.exists() {
        return Err(DiscoveryError::UnknownInput(format!(
            "Audio file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_AUDIO_FORMATS.contains(&extension.as_str()) {
        return Err(DiscoveryError::Transcription(format!(
            "Unsupported format: '.{}'. Supported: {}",
            extension,
            SUPPORTED_AUDIO_FORMATS.join(", ")
        )));
    }

    let audio = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("audio.{}", extension));
    info!(
        "Transcribing audio file: {} ({:.2} MB)",
        file_name,
        audio.len() as f64 / 1024.0 / 1024.0
    );

    let text = transcriber
        .transcribe(audio, &file_name, language)
        .await
        .map_err(|e| DiscoveryError::Transcription(format!("{:#}", e)))?;
    info!("Transcription complete: {} characters", text.chars().count());
    Ok(text)
}

pub struct WhisperTranscriber {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    prompt: Option<String>,
}

impl WhisperTranscriber {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "whisper-1".to_string(),
            prompt: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Vocabulary hint passed to the model.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        language: Option<&str>,
    ) -> anyhow::Result<String> {
        let mut form = Form::new()
            .part("file", Part::bytes(audio).file_name(file_name.to_string()))
            .text("model", self.model.clone())
            .text("response_format", "text");
        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }
        if let Some(prompt) = &self.prompt {
            form = form.text("prompt", prompt.clone());
        }

        debug!("Posting {} to the transcription endpoint.", file_name);
        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach the transcription service")?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read transcription response")?;
        if !status.is_success() {
            bail!("transcription service returned {}: {}", status, body);
        }
        Ok(body)
    }
}
