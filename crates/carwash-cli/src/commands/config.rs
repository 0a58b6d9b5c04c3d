//! `carwash config`: inspect the effective configuration.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = lookup(config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }
        ConfigCommands::List if output.is_json() => output.json(config)?,
        ConfigCommands::List => {
            output.header("Effective settings")?;
            output.print(&rendered(config)?)?;
        }
        // The explicit -c file when given, else the platform location.
        ConfigCommands::Path => {
            let path = global.config.clone().unwrap_or_else(AppConfig::config_path);
            output.print(&path.display().to_string())?;
        }
    }
    Ok(())
}

pub(crate) fn rendered(config: &AppConfig) -> CliResult<String> {
    config.to_toml().map_err(|e| CliError::ConfigError {
        message: format!("cannot render settings as TOML: {e}"),
        source: Some(Box::new(e)),
    })
}

fn lookup(config: &AppConfig, key: &str) -> CliResult<String> {
    config.get(key).ok_or_else(|| CliError::ConfigError {
        message: format!("no setting named '{key}'; try one of {}", AppConfig::KEYS.join(", ")),
        source: None,
    })
}
