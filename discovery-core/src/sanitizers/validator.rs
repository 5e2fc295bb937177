//! Fail-closed PII gate for extracted output.
//!
//! Only email, phone and employee-id patterns are checked here. Names, IBANs
//! and API tokens are handled by redaction before extraction and are not
//! re-checked on the way out.

use log::{error, info};

use crate::errors::{DiscoveryError, Result};
use crate::models::InsightRecord;
use crate::rules::{PiiCategory, RuleSet};

/// Outcome of checking an insight record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    Fail(Vec<PiiCategory>),
}

/// Returns the validated categories whose pattern matches the serialized record.
pub fn find_output_pii(insights: &InsightRecord, ruleset: &RuleSet) -> Result<ValidationOutcome> {
    let all_text = insights.to_canonical_json().map_err(|e| {
        DiscoveryError::Extraction(anyhow::anyhow!("insight record could not be serialized: {}", e))
    })?;

    let found: Vec<PiiCategory> = PiiCategory::VALIDATED
        .iter()
        .copied()
        .filter(|c| ruleset.matcher(*c).regex.is_match(&all_text))
        .collect();

    if found.is_empty() {
        Ok(ValidationOutcome::Pass)
    } else {
        Ok(ValidationOutcome::Fail(found))
    }
}

/// Blocks the record if any validated category is present.
///
/// Every category found is logged before the error is returned.
pub fn validate_no_pii(insights: &InsightRecord, ruleset: &RuleSet) -> Result<()> {
    match find_output_pii(insights, ruleset)? {
        ValidationOutcome::Pass => {
            info!("Output validated - no PII detected.");
            Ok(())
        }
        ValidationOutcome::Fail(categories) => {
            for category in &categories {
                error!("{} detected in output", category.label().to_uppercase());
            }
            Err(DiscoveryError::PiiValidation(categories))
        }
    }
}
