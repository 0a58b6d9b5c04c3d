//! # carwash
//!
//! Front-desk billing for a car wash with a parking lot.
//!
//! Arguments are parsed first, then the subscriber is installed and the
//! layered configuration loaded. `init`, `completions` and `config` run
//! without touching the API; every other command opens a gateway, either
//! HTTP or the in-memory demo store under `--offline`.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! |  0   | Success                                      |
//! |  1   | API unreachable, billing incident, I/O error |
//! |  2   | Rejected input, conflict, partial batch      |
//! |  3   | Record not found                             |
//! |  4   | Configuration error                          |

use std::{io::IsTerminal as _, process::ExitCode};

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    commands::Context,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod render;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version land here too, on stdout.
        Err(e) => {
            e.print().ok();
            return if e.use_stderr() { ExitCode::from(2) } else { ExitCode::SUCCESS };
        }
    };
    let verbose = cli.global.verbose > 0;

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("carwash: cannot set up logging: {e}");
        return ExitCode::FAILURE;
    }
    debug!(
        offline = cli.global.offline,
        config = ?cli.global.config,
        format = ?cli.global.output_format,
        "starting"
    );

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            return handle_error(
                CliError::ConfigError { message: format!("{e:#}"), source: None },
                verbose,
            );
        }
    };
    let output = OutputManager::new(&cli.global, &config);

    match run(cli, config, output).await {
        Ok(()) => {
            info!("done");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Route a parsed command to its handler.
#[instrument(skip_all)]
async fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let global = cli.global;
    let command = match cli.command {
        Commands::Init(args) => return commands::init::execute(args, &output),
        Commands::Completions(args) => return commands::completions::execute(args),
        Commands::Config(cmd) => return commands::config::execute(cmd, &global, &config, &output),
        data => data,
    };

    let ctx = Context::connect(&global, &config, output)?;
    match command {
        Commands::Clients(cmd) => commands::clients::execute(cmd, &ctx).await,
        Commands::Vehicles(cmd) => commands::vehicles::execute(cmd, &ctx).await,
        Commands::Tariffs(cmd) => commands::catalog::tariffs(cmd, &ctx).await,
        Commands::Services(cmd) => commands::catalog::services(cmd, &ctx).await,
        Commands::Assign(args) => commands::assign::execute(args, &ctx).await,
        Commands::Invoice(cmd) => commands::invoice::issue(cmd, &ctx).await,
        Commands::Invoices(cmd) => commands::invoice::list(cmd, &ctx).await,
        Commands::Dashboard => commands::dashboard::execute(&ctx).await,
        Commands::Init(_) | Commands::Completions(_) | Commands::Config(_) => Ok(()),
    }
}

/// Report `err` on stderr and map it to the process exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();
    let message = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{message}");
    ExitCode::from(err.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn metadata_comes_from_the_manifest() {
        let command = Cli::command();
        assert_eq!(command.get_name(), "carwash");
        assert_eq!(command.get_version(), Some(env!("CARGO_PKG_VERSION")));
        assert!(command.get_author().is_some());
    }
}
