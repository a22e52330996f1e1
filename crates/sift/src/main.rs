//! Command-line interface for `sift`.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{CommandContext, args::Cli, commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = if cli.command.needs_config() {
        CommandContext::load()
    } else {
        CommandContext::load_cwd_only()
    };

    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
