//! `redact`: print the input with every PII match replaced.

use anyhow::Result;
use discovery_core::redact;
use std::io::{self, Write};

use crate::cli::RedactCommand;
use crate::commands::{load_guidelines, read_input};
use crate::ui::output_format::warn_msg;

pub fn run_redact(cmd: &RedactCommand) -> Result<()> {
    let guidelines = load_guidelines(cmd.config.as_deref())?;
    if !guidelines.ruleset.enabled() {
        warn_msg("PII removal is disabled in the guidelines; input is printed unchanged.");
    }
    let input = read_input(cmd.input_file.as_deref())?;
    let sanitized = redact(&input, &guidelines.ruleset);

    let mut stdout = io::stdout().lock();
    stdout.write_all(sanitized.as_bytes())?;
    if !sanitized.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}
