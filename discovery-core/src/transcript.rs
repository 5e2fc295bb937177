//! Transcripts and the catalog of named, server-side transcript variants.

use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{DiscoveryError, Result};

/// Raw interview text together with the variant it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub variant_id: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>, variant_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            variant_id: variant_id.into(),
        }
    }
}

/// Reads a transcript file. A missing file is an unknown-input error.
pub fn load_transcript(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DiscoveryError::UnknownInput(format!(
            "Transcript not found: {}",
            path.display()
        )));
    }
    debug!("Reading transcript from {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

/// Variant id to transcript path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantCatalog {
    variants: BTreeMap<String, PathBuf>,
}

impl VariantCatalog {
    pub fn new(variants: BTreeMap<String, PathBuf>) -> Self {
        Self { variants }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn path(&self, variant_id: &str) -> Result<&Path> {
        self.variants.get(variant_id).map(PathBuf::as_path).ok_or_else(|| {
            DiscoveryError::UnknownInput(format!(
                "Unknown variant '{}'. Allowed: [{}]",
                variant_id,
                self.ids().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Loads the transcript for a variant.
    pub fn load(&self, variant_id: &str) -> Result<Transcript> {
        let path = self.path(variant_id)?;
        if !path.exists() {
            return Err(DiscoveryError::UnknownInput(format!(
                "Variant '{}' file missing at {}",
                variant_id,
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Transcript::new(text, variant_id))
    }
}
