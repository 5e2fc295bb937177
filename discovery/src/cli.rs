// discovery/src/cli.rs
//! This file defines the command-line interface (CLI) for the discovery
//! application, including all available commands and their arguments.

use clap::{Parser, Subcommand, ValueEnum};
use discovery_core::AnalysisMode;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "discovery",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extract product insights from interview transcripts without leaking PII",
    long_about = "Discovery audits and redacts personally identifiable information from interview transcripts, sends only the redacted text to an extraction model, and blocks any result that still contains contact details.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyzes a transcript or audio file and prints the insights.
    Analyze(AnalyzeCommand),

    /// Serves an analysis request for a named transcript variant.
    Run(RunCommand),

    /// Prints the input with all PII replaced by category tokens.
    Redact(RedactCommand),

    /// Counts PII per category without modifying the input.
    Audit(AuditCommand),
}

/// Options shared by every command that talks to the extraction model.
#[derive(Parser, Debug, Clone)]
pub struct ExtractionArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, help = "API key for the extraction and transcription services.")]
    pub api_key: Option<String>,

    #[arg(long, value_name = "MODEL", help = "Chat model used for extraction (default: gpt-4o-mini).")]
    pub model: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", value_name = "URL", help = "OpenAI-compatible API base URL.")]
    pub base_url: Option<String>,

    #[arg(long, value_name = "FILE", help = "Replay insights from a JSON file instead of calling the model.")]
    pub replay: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct AnalyzeCommand {
    /// Transcript file, or audio file with --audio.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[arg(long, env = "DISCOVERY_CONFIG", value_name = "FILE", help = "Path to a research guidelines YAML file.")]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'o', value_name = "FILE", help = "Write the insights as JSON to this file.")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Skip the PII audit stage.")]
    pub no_audit: bool,

    #[arg(long, help = "Skip output validation. PII in the result is not blocked.")]
    pub no_validate: bool,

    #[arg(long, help = "Treat FILE as audio and transcribe it first.")]
    pub audio: bool,

    #[arg(long, value_name = "LANG", requires = "audio", help = "Language hint for transcription (e.g. 'en').")]
    pub language: Option<String>,

    #[arg(long, value_name = "FILE", requires = "audio", help = "Save the raw transcript to this file.")]
    pub save_transcript: Option<PathBuf>,

    #[arg(long, help = "Print tab-separated rows for pasting into Mural or Miro.")]
    pub mural: bool,

    #[arg(long, value_name = "FILE", help = "Append a JSON-lines compliance record for each audit.")]
    pub audit_log: Option<PathBuf>,

    #[command(flatten)]
    pub extraction: ExtractionArgs,
}

/// Cache policy accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Cached,
    Live,
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => AnalysisMode::Auto,
            ModeArg::Cached => AnalysisMode::Cached,
            ModeArg::Live => AnalysisMode::Live,
        }
    }
}

#[derive(Parser, Debug)]
pub struct RunCommand {
    #[arg(long, value_name = "ID", help = "Variant id declared in the guidelines (e.g. 'sanitized').")]
    pub variant: String,

    #[arg(long, value_enum, default_value = "auto", help = "Cache policy for this request.")]
    pub mode: ModeArg,

    #[arg(long, env = "DISCOVERY_CONFIG", value_name = "FILE", help = "Path to a research guidelines YAML file.")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "DISCOVERY_CACHE_DIR", value_name = "DIR", help = "Directory holding cached results.")]
    pub cache_dir: Option<PathBuf>,

    #[command(flatten)]
    pub extraction: ExtractionArgs,
}

#[derive(Parser, Debug)]
pub struct RedactCommand {
    #[arg(long = "input-file", short = 'i', value_name = "FILE", help = "Read input from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[arg(long, env = "DISCOVERY_CONFIG", value_name = "FILE", help = "Path to a research guidelines YAML file.")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct AuditCommand {
    #[arg(long = "input-file", short = 'i', value_name = "FILE", help = "Read input from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[arg(long, env = "DISCOVERY_CONFIG", value_name = "FILE", help = "Path to a research guidelines YAML file.")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print counts as JSON.")]
    pub json: bool,
}
