//! Terminal rendering of insight records.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use discovery_core::InsightRecord;
use std::io::{self, Write};

/// Rows of `(headline, details, quote)` for one section.
type Rows = Vec<(String, String, String)>;

fn sections(insights: &InsightRecord) -> Vec<(&'static str, Rows)> {
    vec![
        (
            "Pain Points",
            insights
                .pain_points
                .iter()
                .map(|p| (p.description.clone(), format!("Impact: {}", p.impact), p.quote.clone()))
                .collect(),
        ),
        (
            "Jobs to Be Done",
            insights
                .jobs_to_be_done
                .iter()
                .map(|j| {
                    (
                        j.functional_job.clone(),
                        format!("Emotional: {}\nContext: {}", j.emotional_job, j.context),
                        j.quote.clone(),
                    )
                })
                .collect(),
        ),
        (
            "Workarounds",
            insights
                .workarounds
                .iter()
                .map(|w| {
                    (
                        w.what_they_do.clone(),
                        format!("Why: {}\nCost: {}", w.why_needed, w.cost),
                        w.quote.clone(),
                    )
                })
                .collect(),
        ),
        (
            "Desired Outcomes",
            insights
                .desired_outcomes
                .iter()
                .map(|o| (o.outcome.clone(), format!("Gap: {}", o.current_gap), o.quote.clone()))
                .collect(),
        ),
        (
            "Behavioral Signals",
            insights
                .behavioral_signals
                .iter()
                .map(|s| {
                    (
                        s.observation.clone(),
                        format!("Reveals: {}", s.what_it_reveals),
                        s.quote.clone(),
                    )
                })
                .collect(),
        ),
        (
            "Mental Models",
            insights
                .mental_models
                .iter()
                .map(|m| {
                    let details = [
                        m.metaphor_or_analogy.as_ref().map(|v| format!("Metaphor: {}", v)),
                        m.mismatch_with_reality.as_ref().map(|v| format!("Mismatch: {}", v)),
                    ]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("\n");
                    (m.description.clone(), details, m.quote.clone())
                })
                .collect(),
        ),
    ]
}

/// Prints one table per non-empty section.
pub fn print_insights<W: Write>(insights: &InsightRecord, writer: &mut W) -> io::Result<()> {
    if insights.is_empty() {
        return writeln!(writer, "No insights extracted.");
    }

    for (title, rows) in sections(insights) {
        if rows.is_empty() {
            continue;
        }
        writeln!(writer, "\n{} ({})", title.to_uppercase(), rows.len())?;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["#", "Finding", "Details", "Quote"]);
        for (i, (headline, details, quote)) in rows.into_iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(headline),
                Cell::new(details),
                Cell::new(format!("\"{}\"", quote)),
            ]);
        }
        writeln!(writer, "{}", table)?;
    }
    Ok(())
}

/// Wraps the Mural export in copy-paste instructions.
pub fn print_mural_export<W: Write>(export: &str, writer: &mut W) -> io::Result<()> {
    let rule = "=".repeat(70);
    writeln!(writer, "{}", rule)?;
    writeln!(writer, "MURAL/MIRO EXPORT - COPY EVERYTHING BELOW")?;
    writeln!(writer, "{}", rule)?;
    writeln!(writer, "{}", export)?;
    writeln!(writer, "{}", rule)
}
