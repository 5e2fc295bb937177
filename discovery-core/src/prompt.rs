//! Builds the extraction system prompt from the guideline frameworks.

use serde::Serialize;
use std::collections::BTreeMap;
use tinytemplate::TinyTemplate;

use crate::errors::{DiscoveryError, Result};

static PROMPT_TEMPLATE: &str = "You are an expert product researcher.

APPLY THESE FRAMEWORKS:

{{ for fw in frameworks }}{ fw.heading }:
{ fw.description }

{{ endfor }}
Extract ALL insights from the interview:
- Pain points: Problems causing time waste, costs, uncertainty, frustration
- Jobs-to-be-done: What they're trying to accomplish (functional + emotional goals)
- Workarounds: Current hacks/solutions they've created
- Desired outcomes: What success looks like to them
- Behavioral signals: Implicit patterns revealing underlying needs
- Mental models: How they conceptualize their work

Always include exact quotes as evidence.
";

// Kept out of the template: tinytemplate treats braces as syntax.
const RESPONSE_SHAPE: &str = r#"
Respond with a single JSON object of this shape (every list may be empty):
{
  "pain_points": [{"description": "", "impact": "", "quote": ""}],
  "jobs_to_be_done": [{"functional_job": "", "emotional_job": "", "context": "", "quote": ""}],
  "workarounds": [{"what_they_do": "", "why_needed": "", "cost": "", "quote": ""}],
  "desired_outcomes": [{"outcome": "", "current_gap": "", "quote": ""}],
  "behavioral_signals": [{"observation": "", "what_it_reveals": "", "quote": ""}],
  "mental_models": [{"description": "", "metaphor_or_analogy": null, "mismatch_with_reality": null, "quote": ""}]
}
"#;

#[derive(Serialize)]
struct FrameworkSection<'a> {
    heading: String,
    description: &'a str,
}

#[derive(Serialize)]
struct PromptContext<'a> {
    frameworks: Vec<FrameworkSection<'a>>,
}

/// `jobs_to_be_done` becomes `JOBS TO BE DONE`.
fn framework_heading(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

/// Renders the system prompt. Frameworks appear in key order.
pub fn build_system_prompt(frameworks: &BTreeMap<String, String>) -> Result<String> {
    let context = PromptContext {
        frameworks: frameworks
            .iter()
            .map(|(name, description)| FrameworkSection {
                heading: framework_heading(name),
                description: description.trim(),
            })
            .collect(),
    };

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("system_prompt", PROMPT_TEMPLATE)
        .map_err(|e| DiscoveryError::Config(format!("invalid prompt template: {}", e)))?;
    let mut prompt = tt
        .render("system_prompt", &context)
        .map_err(|e| DiscoveryError::Config(format!("failed to render system prompt: {}", e)))?;
    prompt.push_str(RESPONSE_SHAPE);
    Ok(prompt)
}
