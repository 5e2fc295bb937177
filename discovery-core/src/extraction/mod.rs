//! The boundary to the external text-extraction capability.
//!
//! Extractors come in two explicit flavours. `BlockingExtractor` does its work
//! on the calling thread; `AsyncExtractor` suspends. The caller picks one when
//! building an `Extractor`, and the analyzer never inspects the collaborator
//! to guess which it is. Blocking work is moved to tokio's blocking pool so a
//! slow synchronous extractor cannot stall other requests.

use anyhow::anyhow;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::errors::{DiscoveryError, Result};
use crate::models::InsightRecord;

pub mod openai;
pub mod replay;

pub use openai::OpenAiExtractor;
pub use replay::ReplayExtractor;

/// An extractor that completes on the calling thread.
pub trait BlockingExtractor: Send + Sync {
    fn extract(&self, sanitized_text: &str, system_prompt: &str) -> anyhow::Result<InsightRecord>;
}

/// An extractor that suspends while waiting on a remote service.
#[async_trait]
pub trait AsyncExtractor: Send + Sync {
    async fn extract(&self, sanitized_text: &str, system_prompt: &str) -> anyhow::Result<InsightRecord>;
}

/// An extraction capability together with its calling convention.
#[derive(Clone)]
pub enum Extractor {
    Blocking(Arc<dyn BlockingExtractor>),
    Suspending(Arc<dyn AsyncExtractor>),
}

impl Extractor {
    pub fn blocking(extractor: impl BlockingExtractor + 'static) -> Self {
        Extractor::Blocking(Arc::new(extractor))
    }

    pub fn suspending(extractor: impl AsyncExtractor + 'static) -> Self {
        Extractor::Suspending(Arc::new(extractor))
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Extractor::Blocking(_))
    }

    /// Runs the extraction. Failures of either flavour become
    /// `DiscoveryError::Extraction` carrying the underlying cause.
    pub async fn extract(&self, sanitized_text: &str, system_prompt: &str) -> Result<InsightRecord> {
        match self {
            Extractor::Blocking(inner) => {
                let inner = Arc::clone(inner);
                let text = sanitized_text.to_string();
                let prompt = system_prompt.to_string();
                tokio::task::spawn_blocking(move || inner.extract(&text, &prompt))
                    .await
                    .map_err(|e| DiscoveryError::Extraction(anyhow!("extraction task failed: {}", e)))?
                    .map_err(DiscoveryError::Extraction)
            }
            Extractor::Suspending(inner) => inner
                .extract(sanitized_text, system_prompt)
                .await
                .map_err(DiscoveryError::Extraction),
        }
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extractor::Blocking(_) => f.write_str("Extractor::Blocking"),
            Extractor::Suspending(_) => f.write_str("Extractor::Suspending"),
        }
    }
}
