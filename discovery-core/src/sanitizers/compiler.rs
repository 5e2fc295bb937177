//! compiler.rs - Compiles privacy rules into regex matchers.
//!
//! Every pattern is checked for length and compiled with a bounded program
//! size. All failures are collected so a broken configuration reports every
//! bad category at once rather than the first one only.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::errors::{DiscoveryError, Result};
use crate::rules::{PatternSet, PiiCategory, PrivacyRule};

/// Maximum allowed length for a detection pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Upper bound on the compiled program size of a single pattern.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A detection pattern compiled and paired with its replacement token.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub category: PiiCategory,
    pub regex: Regex,
    pub replace_token: String,
}

/// Compiles one rule.
pub fn compile_rule(rule: &PrivacyRule) -> Result<CompiledRule> {
    let pattern = rule.detect_pattern.as_str();

    if pattern.is_empty() {
        return Err(DiscoveryError::Config(format!(
            "Rule '{}' has an empty detection pattern.",
            rule.category
        )));
    }
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(DiscoveryError::Config(format!(
            "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
            rule.category,
            pattern.len(),
            MAX_PATTERN_LENGTH
        )));
    }
    if rule.replace_token.is_empty() {
        return Err(DiscoveryError::Config(format!(
            "Rule '{}' has an empty replacement token.",
            rule.category
        )));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(!rule.case_sensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| {
            DiscoveryError::Config(format!(
                "Failed to compile pattern for rule '{}': {}",
                rule.category, e
            ))
        })?;

    debug!(
        target: "discovery_core::sanitizer",
        "Rule '{}' compiled successfully (case_sensitive: {}).",
        rule.category,
        rule.case_sensitive
    );

    Ok(CompiledRule {
        category: rule.category,
        regex,
        replace_token: rule.replace_token.clone(),
    })
}

/// Compiles one rule per category into a `PatternSet`.
///
/// `rules` must already hold exactly one rule for each category.
pub fn compile_pattern_set(rules: &[PrivacyRule]) -> Result<PatternSet> {
    debug!("Starting compilation of {} privacy rules.", rules.len());

    let mut compiled = Vec::with_capacity(rules.len());
    let mut errors = Vec::new();
    for rule in rules {
        match compile_rule(rule) {
            Ok(c) => compiled.push(c),
            Err(e) => errors.push(e.to_string()),
        }
    }

    if !errors.is_empty() {
        return Err(DiscoveryError::Config(format!(
            "Failed to compile {} rule(s):\n{}",
            errors.len(),
            errors.join("\n")
        )));
    }

    let mut take = |category: PiiCategory| -> Result<CompiledRule> {
        let idx = compiled
            .iter()
            .position(|c| c.category == category)
            .ok_or_else(|| {
                DiscoveryError::Config(format!("Missing rule for PII category '{}'.", category))
            })?;
        Ok(compiled.swap_remove(idx))
    };

    let set = PatternSet {
        api_token: take(PiiCategory::ApiToken)?,
        iban: take(PiiCategory::Iban)?,
        email: take(PiiCategory::Email)?,
        phone: take(PiiCategory::Phone)?,
        employee_id: take(PiiCategory::EmployeeId)?,
        names: take(PiiCategory::Names)?,
    };
    debug!("Finished compiling privacy rules.");
    Ok(set)
}
