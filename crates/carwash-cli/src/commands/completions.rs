//! Shell completion generation.

use std::io;

use clap::CommandFactory;
use clap_complete::{Shell as Target, generate};

use crate::cli::{Cli, CompletionsArgs, Shell};
use crate::error::CliResult;

const BIN_NAME: &str = "carwash";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    let target = match args.shell {
        Shell::Bash => Target::Bash,
        Shell::Zsh => Target::Zsh,
        Shell::Fish => Target::Fish,
        Shell::PowerShell => Target::PowerShell,
        Shell::Elvish => Target::Elvish,
    };
    generate(target, &mut Cli::command(), BIN_NAME, &mut io::stdout());
    Ok(())
}
