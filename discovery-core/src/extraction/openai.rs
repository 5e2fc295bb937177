//! OpenAI chat-completions client returning structured insight records.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::extraction::AsyncExtractor;
use crate::models::InsightRecord;

/// Model used unless overridden with `with_model`.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Low temperature keeps extractions close to the transcript.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Async extractor backed by the chat-completions API in JSON output mode.
///
/// Only ever receives redacted text; the analyzer redacts before calling it.
pub struct OpenAiExtractor {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl OpenAiExtractor {
    /// Creates an extractor using the `DEFAULT_*` settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the model name sent with each request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Points the client at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model the extractor will request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Parses the assistant message into an insight record.
fn parse_completion(completion: ChatCompletion) -> Result<InsightRecord> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| anyhow!("completion contained no message content"))?;
    serde_json::from_str(&content).context("completion is not a valid insight record")
}

#[async_trait]
impl AsyncExtractor for OpenAiExtractor {
    async fn extract(&self, sanitized_text: &str, system_prompt: &str) -> Result<InsightRecord> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": sanitized_text },
            ],
        });

        debug!("Requesting insight extraction from model '{}'.", self.model);
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the extraction service")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            bail!("extraction service returned {}: {}", status, detail);
        }

        let completion: ChatCompletion = resp
            .json()
            .await
            .context("Failed to decode extraction service response")?;
        let record = parse_completion(completion)?;
        info!("Extraction returned {} findings.", record.len());
        Ok(record)
    }
}
