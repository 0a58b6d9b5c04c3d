//! `carwash init`: write a default configuration file.

use std::path::PathBuf;

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Where `init` writes: `./carwash.toml` with `--local`, else the platform file.
fn target(args: &InitArgs) -> PathBuf {
    if args.local {
        PathBuf::from(AppConfig::LOCAL_FILE)
    } else {
        AppConfig::config_path()
    }
}

pub fn execute(args: InitArgs, output: &OutputManager) -> CliResult<()> {
    let path = target(&args);
    if path.exists() && !args.force {
        output.warning(&format!(
            "{} already exists; pass --force to replace it",
            path.display()
        ))?;
        return Ok(());
    }

    let body = super::config::rendered(&AppConfig::default())?;
    let io_error = |what: &str, e| CliError::IoError {
        message: format!("cannot {what} {}", path.display()),
        source: e,
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_error("create the directory for", e))?;
    }
    std::fs::write(&path, body).map_err(|e| io_error("write", e))?;

    output.success(&format!("Wrote default settings to {}", path.display()))?;
    Ok(())
}
