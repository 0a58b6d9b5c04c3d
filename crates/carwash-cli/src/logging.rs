//! Tracing subscriber setup.
//!
//! Only the binary installs a subscriber; `carwash-core` and
//! `carwash-adapters` emit events and spans and nothing else.
//!
//! | Flags     | Level |
//! |-----------|-------|
//! | (none)    | warn  |
//! | `-v`      | info  |
//! | `-vv`     | debug (adds event targets) |
//! | `-vvv`    | trace |
//! | `--quiet` | error |
//!
//! A set `RUST_LOG` replaces the flag-derived filter entirely.

use std::io::IsTerminal as _;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Crates whose events follow the verbosity flags.
const TARGETS: [&str; 3] = ["carwash", "carwash_core", "carwash_adapters"];

/// Install the global subscriber, writing to stderr.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = level_for(args);
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(spec) if !spec.trim().is_empty() => EnvFilter::try_new(spec)?,
        _ => EnvFilter::try_new(directives(level))?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_target(level >= LevelFilter::DEBUG)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already set: {e}"))
}

/// `--quiet` beats any number of `-v`.
fn level_for(args: &GlobalArgs) -> LevelFilter {
    match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

fn directives(level: LevelFilter) -> String {
    let level = level.to_string().to_ascii_lowercase();
    TARGETS.map(|target| format!("{target}={level}")).join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
            offline: true,
        }
    }

    #[test]
    fn verbosity_ladder() {
        let cases = [
            (0, LevelFilter::WARN),
            (1, LevelFilter::INFO),
            (2, LevelFilter::DEBUG),
            (3, LevelFilter::TRACE),
            (9, LevelFilter::TRACE),
        ];
        for (verbose, expected) in cases {
            assert_eq!(level_for(&flags(verbose, false)), expected, "-v x{verbose}");
        }
    }

    #[test]
    fn quiet_wins() {
        assert_eq!(level_for(&flags(0, true)), LevelFilter::ERROR);
        assert_eq!(level_for(&flags(3, true)), LevelFilter::ERROR);
    }

    #[test]
    fn one_directive_per_workspace_crate() {
        assert_eq!(
            directives(LevelFilter::DEBUG),
            "carwash=debug,carwash_core=debug,carwash_adapters=debug"
        );
    }
}
