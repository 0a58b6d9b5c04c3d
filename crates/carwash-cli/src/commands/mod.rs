//! Command handlers.
//!
//! Each handler turns parsed arguments into calls on the core services and
//! renders what comes back. No billing rules live here.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use carwash_adapters::{HttpGateway, InMemoryGateway};
use carwash_core::prelude::{
    Cedula, Client, KeyedLocks, Plate, Repositories, SavedRecord, Snapshot, Vehicle,
};

use crate::{
    cli::{ConfirmArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub mod assign;
pub mod catalog;
pub mod clients;
pub mod completions;
pub mod config;
pub mod dashboard;
pub mod init;
pub mod invoice;
pub mod vehicles;

/// What every data command needs: the repositories, the lock table shared by
/// the workflows, and the output sink.
pub struct Context {
    pub repos: Repositories,
    pub locks: KeyedLocks,
    pub output: OutputManager,
}

impl Context {
    /// Connect to the configured API, or to the demo data with `--offline`.
    pub fn connect(global: &GlobalArgs, config: &AppConfig, output: OutputManager) -> CliResult<Self> {
        let repos = if global.offline {
            info!("Using in-memory demo data");
            Repositories::from_gateway(Arc::new(InMemoryGateway::with_demo_data()))
        } else {
            let gateway = HttpGateway::new(config.http())?;
            debug!(base_url = gateway.base_url(), "Using billing API");
            Repositories::from_gateway(Arc::new(gateway))
        };

        Ok(Self {
            repos,
            locks: KeyedLocks::new(),
            output,
        })
    }

    /// Refresh every list, with a spinner while the API answers.
    pub async fn snapshot(&self) -> CliResult<Snapshot> {
        let spinner = self.output.spinner("Loading records...");
        let loaded = self.repos.snapshots().load().await;
        spinner.finish_and_clear();
        Ok(loaded?)
    }

    /// Report a created or updated record.
    pub fn saved(&self, verb: &str, record: &SavedRecord) -> CliResult<()> {
        if self.output.is_json() {
            return self.output.json(&json!({ "action": verb, "record": record.describe() }));
        }
        self.output.success(&format!("{verb} {}", record.describe()))?;
        Ok(())
    }

    /// Report a deleted record.
    pub fn deleted(&self, what: &str) -> CliResult<()> {
        if self.output.is_json() {
            return self.output.json(&json!({ "action": "Deleted", "record": what }));
        }
        self.output.success(&format!("Deleted {what}"))?;
        Ok(())
    }

    /// Ask before deleting `what`, unless `--yes` was given.
    ///
    /// Without a terminal to ask on, `--yes` is required.
    pub fn confirm_delete(&self, what: &str, confirm: ConfirmArgs) -> CliResult<()> {
        if confirm.yes {
            return Ok(());
        }
        if self.output.is_json() || !io::stdin().is_terminal() {
            return Err(CliError::InvalidInput {
                message: format!("deleting {what} needs confirmation; pass --yes"),
            });
        }
        if prompt(&format!("Delete {what}?"))? {
            Ok(())
        } else {
            Err(CliError::Cancelled)
        }
    }
}

/// Look up a vehicle named on the command line.
pub fn find_vehicle<'a>(snapshot: &'a Snapshot, plate: &Plate) -> CliResult<&'a Vehicle> {
    snapshot.vehicle(plate).ok_or_else(|| CliError::UnknownRecord {
        kind: "vehicle",
        key: plate.to_string(),
    })
}

pub fn find_client(snapshot: &Snapshot, cedula: Cedula) -> CliResult<&Client> {
    snapshot.client(cedula).ok_or_else(|| CliError::UnknownRecord {
        kind: "client",
        key: cedula.to_string(),
    })
}

#[cfg(feature = "interactive")]
fn prompt(question: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn prompt(question: &str) -> CliResult<bool> {
    use std::io::Write;

    print!("{question} [y/N] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::cli::OutputFormat;

    /// A context over fresh demo data that prints plain text.
    pub fn offline(format: OutputFormat) -> Context {
        let global = GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config: None,
            output_format: format,
            offline: true,
        };
        let output = OutputManager::new(&global, &AppConfig::default());
        match Context::connect(&global, &AppConfig::default(), output) {
            Ok(ctx) => ctx,
            Err(e) => panic!("offline context: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::offline;
    use super::*;
    use crate::cli::OutputFormat;

    #[tokio::test]
    async fn offline_snapshot_has_demo_records() {
        let ctx = offline(OutputFormat::Plain);
        let snapshot = ctx.snapshot().await.unwrap();
        assert!(find_vehicle(&snapshot, &Plate::new("ABC123").unwrap()).is_ok());
        assert!(find_client(&snapshot, Cedula::new(1_010_101).unwrap()).is_ok());
    }

    #[tokio::test]
    async fn unknown_plate_is_reported_as_not_found() {
        let ctx = offline(OutputFormat::Plain);
        let snapshot = ctx.snapshot().await.unwrap();
        let err = find_vehicle(&snapshot, &Plate::new("NOPE").unwrap()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn yes_skips_the_prompt() {
        let ctx = offline(OutputFormat::Plain);
        assert!(ctx.confirm_delete("vehicle ABC123", ConfirmArgs { yes: true }).is_ok());
    }

    #[test]
    fn json_output_never_prompts() {
        let ctx = offline(OutputFormat::Json);
        let err = ctx
            .confirm_delete("vehicle ABC123", ConfirmArgs { yes: false })
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }
}
