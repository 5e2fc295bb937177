// discovery/src/commands/mod.rs
//! Command implementations and the helpers they share.

use anyhow::{Context, Result, anyhow};
use discovery_core::{Extractor, Guidelines, OpenAiExtractor, ReplayExtractor};
use log::debug;
use std::io::Read;
use std::path::Path;

use crate::cli::ExtractionArgs;

pub mod analyze;
pub mod audit;
pub mod redact;
pub mod run;

/// Loads guidelines from `config`, or the embedded defaults.
pub fn load_guidelines(config: Option<&Path>) -> Result<Guidelines> {
    match config {
        Some(path) => Guidelines::load_from_file(path)
            .with_context(|| format!("Failed to load guidelines from {}", path.display())),
        None => Guidelines::load_default().context("Failed to load default guidelines"),
    }
}

/// Reads the whole input from `path`, or stdin when absent.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file: {}", p.display())),
        None => {
            debug!("Reading input from stdin.");
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

pub(crate) fn require_api_key(args: &ExtractionArgs) -> Result<&str> {
    args.api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow!("OPENAI_API_KEY is not set. Export it, add it to .env, or pass --replay FILE."))
}

/// A replay file selects the offline extractor; otherwise the OpenAI client.
pub fn build_extractor(args: &ExtractionArgs) -> Result<Extractor> {
    if let Some(path) = &args.replay {
        debug!("Using replay extractor: {}", path.display());
        return Ok(Extractor::blocking(ReplayExtractor::from_file(path)));
    }

    let mut client = OpenAiExtractor::new(require_api_key(args)?);
    if let Some(model) = &args.model {
        client = client.with_model(model.as_str());
    }
    if let Some(url) = &args.base_url {
        client = client.with_base_url(url.as_str());
    }
    debug!("Using OpenAI extractor with model '{}'.", client.model());
    Ok(Extractor::suspending(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(api_key: Option<&str>, replay: Option<&str>) -> ExtractionArgs {
        ExtractionArgs {
            api_key: api_key.map(str::to_string),
            model: None,
            base_url: None,
            replay: replay.map(Into::into),
        }
    }

    #[test]
    fn test_replay_needs_no_key() {
        let extractor = build_extractor(&args(None, Some("r.json"))).unwrap();
        assert!(extractor.is_blocking());
    }

    #[test]
    fn test_missing_key_is_reported() {
        let err = build_extractor(&args(Some("  "), None)).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_key_selects_async_client() {
        assert!(!build_extractor(&args(Some("sk-test"), None)).unwrap().is_blocking());
    }
}
