//! Everything a command writes to stdout goes through [`OutputManager`].

use std::io::{self, IsTerminal};
use std::time::Duration;

use comfy_table::{Table, presets};
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use carwash_core::error::Context as _;

use crate::error::CliResult;

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// An explicit `--output-format` wins over `output.format` in the config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => Self::parse_format(&config.output.format),
            explicit => explicit,
        };

        // Auto means Human on a terminal, Plain when piped.
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    fn parse_format(value: &str) -> OutputFormat {
        match value.to_ascii_lowercase().as_str() {
            "human" => OutputFormat::Human,
            "plain" => OutputFormat::Plain,
            "json" => OutputFormat::Json,
            _ => OutputFormat::Auto,
        }
    }

    /// A line of command output; dropped under `--quiet`.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// `✓ msg` in green.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status('\u{2713}', msg, |text| text.green().to_string())
    }

    /// `⚠ msg` in yellow.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status('\u{26a0}', msg, |text| text.yellow().to_string())
    }

    /// `ℹ msg` in blue.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status('\u{2139}', msg, |text| text.blue().to_string())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.chatter_muted() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Status lines are chatter: JSON consumers and `--quiet` never see them.
    fn chatter_muted(&self) -> bool {
        self.quiet || self.is_json()
    }

    fn status(&self, symbol: char, msg: &str, paint: fn(&str) -> String) -> io::Result<()> {
        if self.chatter_muted() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{symbol} {msg}")
        } else {
            let symbol = symbol.to_string();
            format!("{} {}", paint(&symbol).bold(), paint(msg))
        };
        self.term.write_line(&line)
    }

    // Tables and JSON are the command's result, so quiet mode keeps them.

    /// Print a table in the resolved style.
    pub fn table(&self, mut table: Table) -> io::Result<()> {
        if self.no_color {
            table.force_no_tty();
        }
        match self.resolved_format {
            OutputFormat::Human => table.load_preset(presets::UTF8_FULL),
            _ => table.load_preset(presets::ASCII_MARKDOWN),
        };
        self.term.write_line(&table.to_string())
    }

    /// Print `value` as pretty JSON.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        let text = serde_json::to_string_pretty(value).context("encoding output as JSON")?;
        self.term.write_line(&text)?;
        Ok(())
    }

    /// A spinner on stderr while the API is busy. Hidden unless human output.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || self.resolved_format != OutputFormat::Human || !io::stderr().is_terminal()
        {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(quiet: bool, no_color: bool, output_format: OutputFormat) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format,
            offline: true,
        }
    }

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        OutputManager::new(&args(quiet, no_color, OutputFormat::Human), &AppConfig::default())
    }

    #[test]
    fn quiet_mutes_status_lines() {
        let out = make_manager(true, true);
        assert!(out.chatter_muted());
        assert!(out.print("hello").is_ok());
        assert!(out.success("saved").is_ok());
    }

    #[test]
    fn no_color_flag_is_honoured() {
        assert!(!make_manager(false, false).no_color);
        assert!(make_manager(false, true).no_color);
    }

    #[test]
    fn plain_and_json_never_color() {
        let plain = OutputManager::new(
            &args(false, false, OutputFormat::Plain),
            &AppConfig::default(),
        );
        assert!(plain.no_color);
        let json = OutputManager::new(&args(false, false, OutputFormat::Json), &AppConfig::default());
        assert!(json.is_json());
        assert!(json.no_color);
        assert!(json.chatter_muted());
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        let out = OutputManager::new(&args(false, false, OutputFormat::Auto), &config);
        assert_eq!(out.resolved_format, OutputFormat::Json);

        let out = OutputManager::new(&args(false, false, OutputFormat::Plain), &config);
        assert_eq!(out.resolved_format, OutputFormat::Plain);
    }

    #[test]
    fn spinner_is_hidden_outside_human_mode() {
        let out = OutputManager::new(
            &args(false, true, OutputFormat::Plain),
            &AppConfig::default(),
        );
        assert!(out.spinner("loading").is_hidden());
    }
}
