//! Structured insight records produced by the extraction capability.

use serde::{Deserialize, Serialize};

/// A problem the interviewee is experiencing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainPoint {
    /// What is not working for the user.
    pub description: String,
    /// Time lost, extra work, costs, uncertainty.
    pub impact: String,
    /// Verbatim supporting quote from the transcript.
    pub quote: String,
}

/// What the interviewee is trying to accomplish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobToBeDone {
    /// The practical task they need done.
    pub functional_job: String,
    /// How they want to feel while doing it.
    pub emotional_job: String,
    /// When or where the job comes up.
    pub context: String,
    pub quote: String,
}

/// A manual solution the interviewee has built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workaround {
    pub what_they_do: String,
    /// The gap in existing tools that forces the workaround.
    pub why_needed: String,
    /// Time, effort or risk the workaround costs.
    pub cost: String,
    pub quote: String,
}

/// A result the interviewee wants but does not get today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredOutcome {
    /// What success would look like to them.
    pub outcome: String,
    /// What stands between the current state and that outcome.
    pub current_gap: String,
    pub quote: String,
}

/// An implicit pattern revealing an underlying need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralSignal {
    /// What they did or said, as observed.
    pub observation: String,
    /// The need the observation points to.
    pub what_it_reveals: String,
    pub quote: String,
}

/// How the interviewee conceptualizes their work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalModel {
    pub description: String,
    /// Metaphor they used for the work, if any.
    #[serde(default)]
    pub metaphor_or_analogy: Option<String>,
    /// Where their model diverges from how the system behaves.
    #[serde(default)]
    pub mismatch_with_reality: Option<String>,
    pub quote: String,
}

/// All insights extracted from a single interview.
///
/// Collection order carries no meaning. Missing collections deserialize as
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightRecord {
    pub pain_points: Vec<PainPoint>,
    pub jobs_to_be_done: Vec<JobToBeDone>,
    pub workarounds: Vec<Workaround>,
    pub desired_outcomes: Vec<DesiredOutcome>,
    pub behavioral_signals: Vec<BehavioralSignal>,
    pub mental_models: Vec<MentalModel>,
}

impl InsightRecord {
    /// Total number of findings across all collections.
    pub fn len(&self) -> usize {
        self.pain_points.len()
            + self.jobs_to_be_done.len()
            + self.workarounds.len()
            + self.desired_outcomes.len()
            + self.behavioral_signals.len()
            + self.mental_models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical textual form used by the output validator.
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
