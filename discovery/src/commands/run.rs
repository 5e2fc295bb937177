//! `run`: serve a request for a named variant and print the response JSON.

use anyhow::Result;
use discovery_core::{AnalysisRequest, FileCacheStore, InterviewAnalyzer};
use std::sync::Arc;

use crate::cli::RunCommand;
use crate::commands::{build_extractor, load_guidelines};

pub async fn run_request(cmd: &RunCommand) -> Result<()> {
    let guidelines = Arc::new(load_guidelines(cmd.config.as_deref())?);
    let cache = match &cmd.cache_dir {
        Some(dir) => FileCacheStore::new(dir),
        None => FileCacheStore::from_env(),
    };
    log::debug!("Cache directory: {}", cache.dir().display());

    let analyzer = InterviewAnalyzer::new(guidelines, build_extractor(&cmd.extraction)?, Arc::new(cache))?;
    let request = AnalysisRequest::new(cmd.variant.as_str(), cmd.mode.into());
    let response = analyzer.run(&request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
