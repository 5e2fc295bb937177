//! Synchronous extractor that replays a prerecorded insight record.
//!
//! Used for offline runs and demos: the pipeline still audits, redacts and
//! validates, but no text leaves the machine.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::extraction::BlockingExtractor;
use crate::models::InsightRecord;

#[derive(Debug, Clone)]
pub enum ReplayExtractor {
    /// Re-read from disk on every call.
    File(PathBuf),
    Record(InsightRecord),
}

impl ReplayExtractor {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        ReplayExtractor::File(path.into())
    }

    pub fn from_record(record: InsightRecord) -> Self {
        ReplayExtractor::Record(record)
    }
}

impl BlockingExtractor for ReplayExtractor {
    fn extract(&self, sanitized_text: &str, _system_prompt: &str) -> Result<InsightRecord> {
        debug!("Replaying insights for {} chars of sanitized text.", sanitized_text.len());
        match self {
            ReplayExtractor::File(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read replay file {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Replay file {} is not an insight record", path.display()))
            }
            ReplayExtractor::Record(record) => Ok(record.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.json");
        std::fs::write(&path, r#"{"desired_outcomes":[{"outcome":"trust the number","current_gap":"manual checks","quote":"one button"}]}"#).unwrap();
        let record = ReplayExtractor::from_file(&path).extract("x", "p").unwrap();
        assert_eq!(record.desired_outcomes[0].outcome, "trust the number");
    }

    #[test]
    fn test_missing_replay_file_errors() {
        assert!(ReplayExtractor::from_file("/nonexistent/replay.json").extract("x", "p").is_err());
    }
}
