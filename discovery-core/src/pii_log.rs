//! Helpers for logging around sensitive content without leaking it.
//!
//! Matched PII only appears verbatim in debug logs when the process was started
//! with `DISCOVERY_ALLOW_DEBUG_PII=true`.

use lazy_static::lazy_static;
use log::debug;
use sha2::{Digest, Sha256};

use crate::rules::PiiCategory;

lazy_static! {
    /// Read once; whether PII may appear in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("DISCOVERY_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Replaces sensitive text with a length-only placeholder.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_captured_match_debug(module_path: &str, category: PiiCategory, original: &str) {
    debug!(
        "{} Captured match for category '{}' (original): '{}'",
        module_path,
        category,
        get_loggable_content(original)
    );
}

/// Hex SHA-256 of `content`; used to correlate audit records with inputs.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
