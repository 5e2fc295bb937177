//! PII audit of original transcripts.
//!
//! The audit measures what was present before redaction. Its counts are
//! logged, optionally appended to a compliance log, and otherwise ignored by
//! the rest of the pipeline.

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{DiscoveryError, Result};
use crate::pii_log::content_hash;
use crate::rules::{PiiCategory, RuleSet};

/// Per-category occurrence counts for one transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Occurrences per category. Every category is present, zero included.
    pub counts: BTreeMap<PiiCategory, usize>,
}

impl AuditReport {
    pub fn count(&self, category: PiiCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (PiiCategory, usize)> + '_ {
        PiiCategory::AUDIT_ORDER.iter().map(move |c| (*c, self.count(*c)))
    }

    /// Fixed-width table, one row per category plus a total.
    pub fn summary_table(&self) -> String {
        let rule = "-".repeat(30);
        let mut out = String::from("PII Detection Summary:\n");
        out.push_str(&rule);
        out.push('\n');
        for (category, count) in self.iter() {
            out.push_str(&format!("{:<20} {:>5}\n", category.label(), count));
        }
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("{:<20} {:>5}", "TOTAL", self.total()));
        out
    }
}

/// Counts non-overlapping matches of every category in `text`.
///
/// Runs regardless of whether redaction is enabled.
pub fn audit(text: &str, ruleset: &RuleSet) -> AuditReport {
    let counts = PiiCategory::AUDIT_ORDER
        .iter()
        .map(|c| (*c, ruleset.matcher(*c).regex.find_iter(text).count()))
        .collect();
    AuditReport { counts }
}

/// A single compliance log line. Never carries matched text.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditRecord {
    /// RFC 3339 UTC time of the audit.
    pub timestamp: String,
    pub run_id: String,
    /// Hash of the audited text, so lines can be correlated without content.
    pub input_hash: String,
    pub counts: BTreeMap<PiiCategory, usize>,
    pub total: usize,
}

/// Append-only JSON-lines compliance log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &AuditRecord) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Audits `text`, logs the summary and writes the compliance record.
///
/// Any failure here aborts the analysis before data leaves the process.
pub fn run_audit(
    text: &str,
    ruleset: &RuleSet,
    audit_log: Option<&AuditLog>,
    run_id: &str,
) -> Result<AuditReport> {
    let report = audit(text, ruleset);

    for line in report.summary_table().lines() {
        info!("{}", line);
    }

    if let Some(log) = audit_log {
        let record = AuditRecord {
            timestamp: Utc::now().to_rfc3339(),
            run_id: run_id.to_string(),
            input_hash: content_hash(text),
            counts: report.counts.clone(),
            total: report.total(),
        };
        log.append(&record).map_err(|e| {
            DiscoveryError::Audit(format!(
                "could not write audit log {}: {}",
                log.path().display(),
                e
            ))
        })?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PrivacyRule;

    fn ruleset() -> RuleSet {
        RuleSet::new(
            false,
            vec![
                PrivacyRule::new(PiiCategory::ApiToken, r"tok_[a-z]+", "[T]", true),
                PrivacyRule::new(PiiCategory::Iban, r"IBAN\d+", "[I]", true),
                PrivacyRule::new(PiiCategory::Email, r"\w+@\w+\.com", "[E]", false),
                PrivacyRule::new(PiiCategory::Phone, r"\d{3}-\d{4}", "[P]", true),
                PrivacyRule::new(PiiCategory::EmployeeId, r"E\d{3}", "[ID]", false),
                PrivacyRule::new(PiiCategory::Names, r"[A-Z][a-z]+ [A-Z][a-z]+", "[N]", true),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_counts_ignore_enabled_flag() {
        let report = audit("a@b.com and c@d.com, call 555-1234", &ruleset());
        assert_eq!(report.count(PiiCategory::Email), 2);
        assert_eq!(report.count(PiiCategory::Phone), 1);
        assert_eq!(report.count(PiiCategory::Iban), 0);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_iter_follows_reporting_order() {
        let report = audit("", &ruleset());
        let order: Vec<_> = report.iter().map(|(c, _)| c).collect();
        assert_eq!(order, PiiCategory::AUDIT_ORDER.to_vec());
    }

    #[test]
    fn test_summary_table_has_total_row() {
        let table = audit("x@y.com", &ruleset()).summary_table();
        assert!(table.starts_with("PII Detection Summary:"));
        assert!(table.contains("Emails"));
        assert!(table.trim_end().ends_with("1"));
    }

    #[test]
    fn test_run_audit_writes_record_without_pii() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("audit.jsonl"));
        run_audit("reach me at x@y.com", &ruleset(), Some(&log), "run-1").unwrap();
        run_audit("nothing here", &ruleset(), Some(&log), "run-2").unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!written.contains("x@y.com"));
        let first: AuditRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.run_id, "run-1");
        assert_eq!(first.total, 1);
    }

    #[test]
    fn test_unwritable_audit_log_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let log = AuditLog::new(dir.path());
        let err = run_audit("x@y.com", &ruleset(), Some(&log), "run").unwrap_err();
        assert!(matches!(err, DiscoveryError::Audit(_)));
    }
}
