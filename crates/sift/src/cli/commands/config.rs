//! Implementation of `sift config`.

use std::process::ExitCode;

use sift_config::{Config, discover_config_files, is_global_config};

use crate::cli::{
    context::CommandContext,
    failure,
    output::{dim, subheader, warning},
};

/// Shows discovered config files, the effective settings, and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);

    println!("{}", subheader("Config files (highest precedence first):"));
    if config_files.is_empty() {
        println!("   {}", dim("(none found, using defaults)"));
        println!("   Run {} to create one.", subheader("sift init"));
    } else {
        for path in &config_files {
            let scope = if is_global_config(path) {
                "global"
            } else {
                "local"
            };
            println!("   {} {}", path.display(), dim(&format!("({scope})")));
        }
    }
    println!();

    let config = match Config::load_from_files(&config_files) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: failed to load configuration: {e}");
            return failure();
        }
    };

    let settings = match config.settings_to_toml() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return failure();
        }
    };

    println!("{}", subheader("Effective settings:"));
    for line in settings.lines() {
        println!("   {line}");
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("{}", dim("No issues found."));
    } else {
        println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
        for w in &warnings {
            println!("   {}", warning(&format!("- {w}")));
        }
    }

    ExitCode::SUCCESS
}
