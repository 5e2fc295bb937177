//! Styled status messages for stderr.
//!
//! Color is applied only when the target stream is a terminal, so piped and
//! captured output stays plain.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warn,
    Error,
}

impl MessageKind {
    fn prefix(&self) -> &'static str {
        match self {
            MessageKind::Info => "info",
            MessageKind::Success => "ok",
            MessageKind::Warn => "warning",
            MessageKind::Error => "error",
        }
    }
}

/// Writes `[prefix] message` followed by a newline.
pub fn print_message<W: Write>(
    writer: &mut W,
    kind: MessageKind,
    message: &str,
    supports_color: bool,
) -> io::Result<()> {
    let prefix = kind.prefix();
    if !supports_color {
        return writeln!(writer, "[{}] {}", prefix, message);
    }
    match kind {
        MessageKind::Info => writeln!(writer, "[{}] {}", prefix.cyan(), message),
        MessageKind::Success => writeln!(writer, "[{}] {}", prefix.green(), message),
        MessageKind::Warn => writeln!(writer, "[{}] {}", prefix.yellow(), message),
        MessageKind::Error => writeln!(writer, "[{}] {}", prefix.red().bold(), message.red()),
    }
}

fn to_stderr(kind: MessageKind, message: &str) {
    let stderr = io::stderr();
    let supports_color = stderr.is_terminal();
    let _ = print_message(&mut stderr.lock(), kind, message, supports_color);
}

pub fn info_msg(message: impl AsRef<str>) {
    to_stderr(MessageKind::Info, message.as_ref());
}

pub fn success_msg(message: impl AsRef<str>) {
    to_stderr(MessageKind::Success, message.as_ref());
}

pub fn warn_msg(message: impl AsRef<str>) {
    to_stderr(MessageKind::Warn, message.as_ref());
}

pub fn error_msg(message: impl AsRef<str>) {
    to_stderr(MessageKind::Error, message.as_ref());
}
