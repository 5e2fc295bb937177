//! Configuration management for `discovery-core`.
//!
//! Loads the research guidelines document: the framework descriptions used to
//! build the extraction prompt, the PII removal rules, and the named
//! transcript variants. The document is parsed once at startup into an
//! immutable `Guidelines` value.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{DiscoveryError, Result};
use crate::pii_log::content_hash;
use crate::rules::{PiiCategory, PrivacyRule, RuleSet};
use crate::transcript::VariantCatalog;

/// Embedded default guidelines.
pub const DEFAULT_GUIDELINES_YAML: &str = include_str!("../config/research_guidelines.yaml");

/// One value per PII category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryMap<T> {
    pub api_token: T,
    pub iban: T,
    pub email: T,
    pub phone: T,
    pub employee_id: T,
    pub names: T,
}

impl<T> CategoryMap<T> {
    pub fn get(&self, category: PiiCategory) -> &T {
        match category {
            PiiCategory::ApiToken => &self.api_token,
            PiiCategory::Iban => &self.iban,
            PiiCategory::Email => &self.email,
            PiiCategory::Phone => &self.phone,
            PiiCategory::EmployeeId => &self.employee_id,
            PiiCategory::Names => &self.names,
        }
    }
}

fn default_case_insensitive() -> Vec<PiiCategory> {
    vec![PiiCategory::Email, PiiCategory::EmployeeId]
}

/// The `privacy_enforcement.pii_removal` block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiiRemovalConfig {
    pub enabled: bool,
    pub patterns: CategoryMap<String>,
    pub replacement_tokens: CategoryMap<String>,
    /// Categories matched case-insensitively.
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: Vec<PiiCategory>,
}

impl PiiRemovalConfig {
    /// Builds the compiled rule set.
    pub fn to_ruleset(&self) -> Result<RuleSet> {
        let rules = PiiCategory::REDACTION_ORDER
            .iter()
            .map(|c| {
                PrivacyRule::new(
                    *c,
                    self.patterns.get(*c).clone(),
                    self.replacement_tokens.get(*c).clone(),
                    !self.case_insensitive.contains(c),
                )
            })
            .collect();
        RuleSet::new(self.enabled, rules)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrivacyEnforcement {
    pub pii_removal: PiiRemovalConfig,
}

/// The guidelines document as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GuidelinesFile {
    /// Framework name to description; only used to build the prompt.
    #[serde(default)]
    pub frameworks: BTreeMap<String, String>,
    pub privacy_enforcement: PrivacyEnforcement,
    /// Variant id to transcript path, relative to the document.
    #[serde(default)]
    pub variants: BTreeMap<String, PathBuf>,
}

/// Loaded, validated guidelines. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Guidelines {
    pub frameworks: BTreeMap<String, String>,
    pub ruleset: Arc<RuleSet>,
    pub variants: VariantCatalog,
    /// SHA-256 of the source document; part of every cache key.
    pub fingerprint: String,
}

impl Guidelines {
    /// Loads guidelines from a YAML file. Variant paths resolve against the
    /// file's directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading guidelines from: {}", path.display());
        if !path.exists() {
            return Err(DiscoveryError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            DiscoveryError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_yaml_str(&text, &base_dir).map_err(|e| match e {
            DiscoveryError::Config(msg) => {
                DiscoveryError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Loads the embedded default guidelines. Variant paths resolve against
    /// the working directory.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default guidelines from embedded string...");
        Self::from_yaml_str(DEFAULT_GUIDELINES_YAML, Path::new(""))
    }

    /// Parses and validates a guidelines document.
    pub fn from_yaml_str(text: &str, base_dir: &Path) -> Result<Self> {
        let file: GuidelinesFile = serde_yml::from_str(text)
            .map_err(|e| DiscoveryError::Config(format!("Failed to parse guidelines: {}", e)))?;

        let ruleset = file.privacy_enforcement.pii_removal.to_ruleset()?;
        let variants = file
            .variants
            .into_iter()
            .map(|(id, p)| {
                let resolved = if p.is_absolute() { p } else { base_dir.join(p) };
                (id, resolved)
            })
            .collect();

        debug!(
            "Loaded guidelines: {} frameworks, PII removal enabled: {}.",
            file.frameworks.len(),
            ruleset.enabled()
        );

        Ok(Self {
            frameworks: file.frameworks,
            ruleset: Arc::new(ruleset),
            variants: VariantCatalog::new(variants),
            fingerprint: content_hash(text),
        })
    }
}
