//! Log subscriber setup.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive, e.g. `SIFT_LOG=sift_query=trace`.
pub const LOG_ENV: &str = "SIFT_LOG";

/// Maps the `-v` count to a default filter directive.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `SIFT_LOG` wins over `-v` when set and valid.
pub fn init(verbose: u8) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(3), "trace");
        assert_eq!(level_for(u8::MAX), "trace");
    }
}
