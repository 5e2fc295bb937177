//! Tab-separated export for pasting findings onto Mural or Miro boards.

use crate::models::InsightRecord;

fn row(section: &str, index: usize, headline: &str, details: &str, quote: &str) -> String {
    format!("{}\t{}. {}\t{}\tQuote: {}", section, index, headline, details, quote)
}

/// One row per finding: `SECTION\tN. headline\tdetails\tQuote: ...`.
/// Sections follow the record's field order; numbering restarts per section.
pub fn to_mural_text_blocks(insights: &InsightRecord) -> String {
    let mut lines = Vec::with_capacity(insights.len());

    for (i, pp) in insights.pain_points.iter().enumerate() {
        let details = format!("Impact: {}", pp.impact);
        lines.push(row("PAIN POINTS", i + 1, &pp.description, &details, &pp.quote));
    }
    for (i, job) in insights.jobs_to_be_done.iter().enumerate() {
        let details = format!("Emotional: {}. Context: {}", job.emotional_job, job.context);
        lines.push(row("JOBS-TO-BE-DONE", i + 1, &job.functional_job, &details, &job.quote));
    }
    for (i, w) in insights.workarounds.iter().enumerate() {
        let details = format!("Why: {}. Cost: {}", w.why_needed, w.cost);
        lines.push(row("WORKAROUNDS", i + 1, &w.what_they_do, &details, &w.quote));
    }
    for (i, outcome) in insights.desired_outcomes.iter().enumerate() {
        let details = format!("Gap: {}", outcome.current_gap);
        lines.push(row("DESIRED OUTCOMES", i + 1, &outcome.outcome, &details, &outcome.quote));
    }
    for (i, signal) in insights.behavioral_signals.iter().enumerate() {
        let details = format!("Reveals: {}", signal.what_it_reveals);
        lines.push(row("BEHAVIORAL SIGNALS", i + 1, &signal.observation, &details, &signal.quote));
    }
    for (i, model) in insights.mental_models.iter().enumerate() {
        let mut parts = Vec::new();
        if let Some(metaphor) = model.metaphor_or_analogy.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("Metaphor: {}", metaphor));
        }
        if let Some(mismatch) = model.mismatch_with_reality.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("Mismatch: {}", mismatch));
        }
        let details = if parts.is_empty() {
            "---".to_string()
        } else {
            parts.join(". ")
        };
        lines.push(row("MENTAL MODELS", i + 1, &model.description, &details, &model.quote));
    }

    lines.join("\n")
}
