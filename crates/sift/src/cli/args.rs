//! Clap argument definitions for the `sift` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use sift_config::InputFormat;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift", version)]
#[command(about = "Filter text and JSON-lines records with boolean, fuzzy queries")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the `[input]` config section.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Record format: lines or jsonl [default: lines]
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<InputFormat>,

    /// JSON key to search, repeatable (jsonl format) [default: all string values]
    #[arg(long = "field", value_name = "NAME")]
    pub fields: Vec<String>,

    /// Split each line into fields on this string (lines format)
    #[arg(short = 'd', long, value_name = "STRING")]
    pub delimiter: Option<String>,
}

/// Output mode flags for `sift filter`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterOutputArgs {
    /// Print only the number of matching records
    #[arg(short = 'c', long, conflicts_with = "json")]
    pub count: bool,

    /// Print matching records as JSON lines with source and line number
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sift filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
    /// Query to match records against
    pub query: String,

    /// Files to read [default: standard input]
    pub files: Vec<PathBuf>,

    /// Fuzzy distance for terms without a ~N suffix [default: 0]
    #[arg(short = 'f', long, value_name = "N")]
    pub fuzzy: Option<u8>,

    /// Maximum records to print, 0 for no limit [default: 0]
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    #[command(flatten)]
    /// Input format overrides.
    pub input: InputArgs,

    #[command(flatten)]
    /// Output mode flags.
    pub output: FilterOutputArgs,
}

/// Arguments for `sift parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query to parse
    pub query: String,

    /// Print the parse result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sift init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.sift.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `sift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print records that match a query
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term must appear (case-insensitive substring)
  term1 term2       Both terms (implicit AND)
  a AND b           Both terms
  a OR b            Either term
  NOT term          Term must not appear
  \"a phrase\"        Words must appear together, in order
  term~N            Also match words within N edits (N = 0-9)

  NOT binds tightest, then AND, then OR. There is no grouping.

EXAMPLES:
  sift filter rust notes.txt
  sift filter 'rust OR golang NOT java' posts.txt
  sift filter '\"error handling\"' --format jsonl --field title log.jsonl
  sift filter 'colour~1' -n 10 words.txt")]
    Filter(FilterCommand),

    /// Show how a query is parsed
    Parse(ParseCommand),

    /// Initialize sift configuration in current directory
    Init(InitCommand),

    /// Show config files, effective settings and warnings
    Config,
}

impl Commands {
    /// Returns true if the command reads the merged configuration before running.
    pub fn needs_config(&self) -> bool {
        matches!(self, Self::Filter(_))
    }
}
