//! CLI support for the `sift` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod logging;
pub mod output;

use std::process::ExitCode;

pub use context::CommandContext;

/// Exit status for errors, kept apart from the "no match" status.
const ERROR_STATUS: u8 = 2;

/// Exit code for a run that found nothing (`sift filter` only).
pub const NO_MATCH: ExitCode = ExitCode::FAILURE;

/// Exit code for a run that failed.
pub fn failure() -> ExitCode {
    ExitCode::from(ERROR_STATUS)
}
