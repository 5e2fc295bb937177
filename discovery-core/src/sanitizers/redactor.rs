//! Deterministic PII redaction.
//!
//! Each rule rewrites the whole string and hands its output to the next rule.
//! The sequence comes from `PatternSet::in_redaction_order`, so tokens, IBANs,
//! emails, phones and IDs are replaced before the names heuristic can consume
//! parts of them.

use log::debug;
use regex::NoExpand;
use std::borrow::Cow;

use crate::pii_log::log_captured_match_debug;
use crate::rules::RuleSet;

/// Returns `text` with every configured PII pattern replaced by its token.
///
/// A disabled rule set returns the input unchanged.
pub fn redact(text: &str, ruleset: &RuleSet) -> String {
    if !ruleset.enabled() {
        debug!("PII removal disabled; transcript passed through unchanged.");
        return text.to_string();
    }

    let mut current = text.to_string();
    for rule in ruleset.patterns().in_redaction_order() {
        if log::log_enabled!(log::Level::Debug) {
            for m in rule.regex.find_iter(&current) {
                log_captured_match_debug(module_path!(), rule.category, m.as_str());
            }
        }
        let replaced = rule.regex.replace_all(&current, NoExpand(&rule.replace_token));
        if let Cow::Owned(next) = replaced {
            current = next;
        }
    }
    current
}
