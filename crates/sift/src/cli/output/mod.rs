//! Terminal styling and match rendering for CLI output.

use std::io::{self, IsTerminal, Write};

use sift::Record;

/// ANSI color codes for terminal output.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps `text` in an ANSI style when stdout is a terminal.
fn styled(style: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("{style}{text}{}", colors::RESET)
    } else {
        text.to_string()
    }
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    styled(colors::BOLD, text)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    styled(colors::DIM, text)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    styled(colors::YELLOW, text)
}

/// How matching records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFormat {
    /// The record's line, prefixed with `source:` when `with_source` is set.
    Text {
        /// Prefix each line with the input name.
        with_source: bool,
    },
    /// One JSON object per record.
    Json,
    /// Only the final count.
    Count,
}

/// Writes matching records and tracks how many were seen.
pub struct MatchWriter<W> {
    /// Destination.
    out: W,
    /// Rendering mode.
    format: MatchFormat,
    /// Maximum records to accept (0 = unlimited).
    limit: usize,
    /// Records accepted so far.
    matched: usize,
}

impl<W: Write> MatchWriter<W> {
    /// Creates a writer.
    pub fn new(out: W, format: MatchFormat, limit: usize) -> Self {
        Self {
            out,
            format,
            limit,
            matched: 0,
        }
    }

    /// Returns true once `limit` records have been accepted.
    pub fn is_full(&self) -> bool {
        self.limit != 0 && self.matched >= self.limit
    }

    /// Returns the number of records accepted so far.
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Accepts one matching record.
    pub fn write(&mut self, record: &Record) -> io::Result<()> {
        self.matched += 1;
        match self.format {
            MatchFormat::Text { with_source: true } => {
                writeln!(self.out, "{}:{}", record.source, record.text)
            }
            MatchFormat::Text { with_source: false } => writeln!(self.out, "{}", record.text),
            MatchFormat::Json => {
                serde_json::to_writer(&mut self.out, record)?;
                writeln!(self.out)
            }
            MatchFormat::Count => Ok(()),
        }
    }

    /// Prints the count in count mode and flushes.
    pub fn finish(mut self) -> io::Result<usize> {
        if self.format == MatchFormat::Count {
            writeln!(self.out, "{}", self.matched)?;
        }
        self.out.flush()?;
        Ok(self.matched)
    }
}
