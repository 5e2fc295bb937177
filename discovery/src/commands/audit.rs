//! `audit`: count PII per category without changing the input.

use anyhow::Result;
use discovery_core::{AuditReport, PiiCategory, audit};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::AuditCommand;
use crate::commands::{load_guidelines, read_input};

/// Shape of `audit --json` output.
#[derive(Debug, Serialize)]
struct AuditSummary<'a> {
    counts: &'a BTreeMap<PiiCategory, usize>,
    total: usize,
}

impl<'a> From<&'a AuditReport> for AuditSummary<'a> {
    fn from(report: &'a AuditReport) -> Self {
        Self {
            counts: &report.counts,
            total: report.total(),
        }
    }
}

pub fn run_audit(cmd: &AuditCommand) -> Result<()> {
    let guidelines = load_guidelines(cmd.config.as_deref())?;
    let input = read_input(cmd.input_file.as_deref())?;
    let report = audit(&input, &guidelines.ruleset);

    if cmd.json {
        let summary = AuditSummary::from(&report);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", report.summary_table());
    }
    Ok(())
}
