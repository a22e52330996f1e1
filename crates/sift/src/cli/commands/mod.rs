//! Command implementations and dispatch.

pub mod config;
pub mod filter;
pub mod init;
pub mod parse;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Filter(cmd) => filter::run(ctx, &cmd),
        Commands::Parse(cmd) => parse::run(&cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
