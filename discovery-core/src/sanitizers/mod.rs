//! Pattern-based PII handling.
//!
//! `compiler` turns configured rules into regex matchers. `redactor`,
//! `auditor` and `validator` are the three pure operations the analyzer runs
//! over those matchers: rewrite the transcript, count what it contained, and
//! gate what comes back from extraction.

pub mod auditor;
pub mod compiler;
pub mod redactor;
pub mod validator;
