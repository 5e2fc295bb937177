//! rules.rs - PII categories, privacy rules and the immutable rule set.
//!
//! The category set is closed. A `RuleSet` always carries exactly one rule per
//! category, compiled into a `PatternSet` whose fields fix the substitution
//! order used by the redactor.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{DiscoveryError, Result};
use crate::sanitizers::compiler::{compile_pattern_set, CompiledRule};

/// The six PII categories handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    ApiToken,
    Iban,
    Email,
    Phone,
    EmployeeId,
    Names,
}

impl PiiCategory {
    /// Substitution order. Narrow patterns run before the broad names heuristic.
    pub const REDACTION_ORDER: [PiiCategory; 6] = [
        PiiCategory::ApiToken,
        PiiCategory::Iban,
        PiiCategory::Email,
        PiiCategory::Phone,
        PiiCategory::EmployeeId,
        PiiCategory::Names,
    ];

    /// Order in which audit summaries are reported.
    pub const AUDIT_ORDER: [PiiCategory; 6] = [
        PiiCategory::Email,
        PiiCategory::Phone,
        PiiCategory::EmployeeId,
        PiiCategory::Names,
        PiiCategory::Iban,
        PiiCategory::ApiToken,
    ];

    /// Categories checked on extracted output.
    pub const VALIDATED: [PiiCategory; 3] = [
        PiiCategory::Email,
        PiiCategory::Phone,
        PiiCategory::EmployeeId,
    ];

    /// Configuration key of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiCategory::ApiToken => "api_token",
            PiiCategory::Iban => "iban",
            PiiCategory::Email => "email",
            PiiCategory::Phone => "phone",
            PiiCategory::EmployeeId => "employee_id",
            PiiCategory::Names => "names",
        }
    }

    /// Human-readable label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            PiiCategory::ApiToken => "API Tokens",
            PiiCategory::Iban => "IBANs",
            PiiCategory::Email => "Emails",
            PiiCategory::Phone => "Phone Numbers",
            PiiCategory::EmployeeId => "Employee IDs",
            PiiCategory::Names => "Names",
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiCategory {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        PiiCategory::REDACTION_ORDER
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DiscoveryError::Config(format!("Unknown PII category '{}'.", s)))
    }
}

/// A single detection pattern and its replacement token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrivacyRule {
    pub category: PiiCategory,
    pub detect_pattern: String,
    pub replace_token: String,
    pub case_sensitive: bool,
}

impl PrivacyRule {
    pub fn new(
        category: PiiCategory,
        detect_pattern: impl Into<String>,
        replace_token: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        Self {
            category,
            detect_pattern: detect_pattern.into(),
            replace_token: replace_token.into(),
            case_sensitive,
        }
    }
}

/// Compiled matchers, one field per category.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub api_token: CompiledRule,
    pub iban: CompiledRule,
    pub email: CompiledRule,
    pub phone: CompiledRule,
    pub employee_id: CompiledRule,
    pub names: CompiledRule,
}

impl PatternSet {
    pub fn get(&self, category: PiiCategory) -> &CompiledRule {
        match category {
            PiiCategory::ApiToken => &self.api_token,
            PiiCategory::Iban => &self.iban,
            PiiCategory::Email => &self.email,
            PiiCategory::Phone => &self.phone,
            PiiCategory::EmployeeId => &self.employee_id,
            PiiCategory::Names => &self.names,
        }
    }

    /// The rules in substitution order.
    pub fn in_redaction_order(&self) -> [&CompiledRule; 6] {
        [
            &self.api_token,
            &self.iban,
            &self.email,
            &self.phone,
            &self.employee_id,
            &self.names,
        ]
    }
}

/// The loaded, immutable rule set shared by all requests.
#[derive(Debug, Clone)]
pub struct RuleSet {
    enabled: bool,
    rules: Vec<PrivacyRule>,
    patterns: PatternSet,
}

impl RuleSet {
    /// Builds a rule set from exactly one rule per category, in any order.
    ///
    /// Rules are stored in substitution order. Missing or duplicate categories
    /// and uncompilable patterns are configuration errors.
    pub fn new(enabled: bool, rules: Vec<PrivacyRule>) -> Result<Self> {
        let mut ordered = Vec::with_capacity(PiiCategory::REDACTION_ORDER.len());
        for category in PiiCategory::REDACTION_ORDER {
            let mut matching = rules.iter().filter(|r| r.category == category);
            let rule = matching.next().ok_or_else(|| {
                DiscoveryError::Config(format!("Missing rule for PII category '{}'.", category))
            })?;
            if matching.next().is_some() {
                return Err(DiscoveryError::Config(format!(
                    "Duplicate rule for PII category '{}'.",
                    category
                )));
            }
            ordered.push(rule.clone());
        }

        let patterns = compile_pattern_set(&ordered)?;
        Ok(Self { enabled, rules: ordered, patterns })
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Rules in substitution order.
    pub fn rules(&self) -> &[PrivacyRule] {
        &self.rules
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn matcher(&self, category: PiiCategory) -> &CompiledRule {
        self.patterns.get(category)
    }
}
