//! Implementation of `sift filter`.

use std::{
    io::{self, BufRead, ErrorKind, Write},
    process::ExitCode,
};

use sift::{Records, open};
use sift_config::{Config, InputSettings};
use sift_match::{EvalOptions, Matcher};
use tracing::{debug, trace};

use crate::cli::{
    NO_MATCH,
    args::{FilterCommand, InputArgs},
    context::CommandContext,
    failure,
    output::{MatchFormat, MatchWriter},
};

/// Name used for records read from standard input.
const STDIN_NAME: &str = "<stdin>";

/// Settings for one filter run: config values with CLI flags applied on top.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterSettings {
    /// How input lines become records.
    input: InputSettings,
    /// Fuzzy distance for terms without a `~N` suffix.
    default_fuzzy: u8,
    /// Maximum records to print (0 = unlimited).
    limit: usize,
}

impl FilterSettings {
    /// Applies command-line overrides to the loaded configuration.
    fn resolve(cmd: &FilterCommand, config: &Config) -> Self {
        Self {
            input: apply_input_args(&cmd.input, &config.input),
            default_fuzzy: cmd.fuzzy.unwrap_or(config.search.default_fuzzy),
            limit: cmd.limit.unwrap_or(config.output.limit),
        }
    }
}

/// Overlays `--format`, `--field` and `--delimiter` on configured input settings.
fn apply_input_args(args: &InputArgs, base: &InputSettings) -> InputSettings {
    let mut settings = base.clone();
    if let Some(format) = args.format {
        settings.format = format;
    }
    if !args.fields.is_empty() {
        settings.fields.clone_from(&args.fields);
    }
    if let Some(ref delimiter) = args.delimiter {
        settings.delimiter = Some(delimiter.clone());
    }
    settings
}

/// Prints the records that satisfy the query.
///
/// Exits 0 if any record matched, 1 if none did, 2 if an input could not be read.
pub fn run(ctx: &CommandContext, cmd: &FilterCommand) -> ExitCode {
    let settings = FilterSettings::resolve(cmd, &ctx.config);
    let matcher = Matcher::new(
        &cmd.query,
        EvalOptions::with_default_fuzzy(settings.default_fuzzy),
    );
    debug!(
        query = %cmd.query,
        terms = matcher.parsed().terms.len(),
        fuzzy = matcher.options().default_fuzzy,
        limit = settings.limit,
        format = %settings.input.format,
        "filtering records"
    );

    let format = if cmd.output.count {
        MatchFormat::Count
    } else if cmd.output.json {
        MatchFormat::Json
    } else {
        MatchFormat::Text {
            with_source: cmd.files.len() > 1,
        }
    };
    let mut writer = MatchWriter::new(io::stdout().lock(), format, settings.limit);

    match filter_inputs(cmd, &settings.input, &matcher, &mut writer) {
        Ok(had_error) => finish(writer, had_error),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => exit_for(writer.matched(), false),
        Err(e) => {
            eprintln!("error: failed to write output: {e}");
            failure()
        }
    }
}

/// Runs every input through the matcher. Returns whether any input failed.
fn filter_inputs<W: Write>(
    cmd: &FilterCommand,
    input: &InputSettings,
    matcher: &Matcher,
    writer: &mut MatchWriter<W>,
) -> io::Result<bool> {
    if cmd.files.is_empty() {
        let records = Records::new(io::stdin().lock(), STDIN_NAME, input);
        return filter_records(records, matcher, writer);
    }

    let mut had_error = false;
    for path in &cmd.files {
        if writer.is_full() {
            break;
        }
        match open(path, input) {
            Ok(records) => had_error |= filter_records(records, matcher, writer)?,
            Err(e) => {
                eprintln!("error: {e}");
                had_error = true;
            }
        }
    }
    Ok(had_error)
}

/// Writes each matching record of one input. Returns whether any line failed to load.
fn filter_records<R: BufRead, W: Write>(
    records: Records<'_, R>,
    matcher: &Matcher,
    writer: &mut MatchWriter<W>,
) -> io::Result<bool> {
    debug!(input = records.name(), "reading records");
    let mut had_error = false;
    for result in records {
        match result {
            Ok(record) => {
                if matcher.matches_fields(&record.fields) {
                    trace!(source = %record.source, line = record.line, "record matched");
                    writer.write(&record)?;
                    if writer.is_full() {
                        break;
                    }
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                had_error = true;
            }
        }
    }
    Ok(had_error)
}

/// Flushes output and maps the outcome to an exit code.
fn finish<W: Write>(writer: MatchWriter<W>, had_error: bool) -> ExitCode {
    let matched = writer.matched();
    match writer.finish() {
        Ok(_) => exit_for(matched, had_error),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => exit_for(matched, had_error),
        Err(e) => {
            eprintln!("error: failed to write output: {e}");
            failure()
        }
    }
}

/// Exit code for a completed run.
fn exit_for(matched: usize, had_error: bool) -> ExitCode {
    if had_error {
        failure()
    } else if matched > 0 {
        ExitCode::SUCCESS
    } else {
        NO_MATCH
    }
}
