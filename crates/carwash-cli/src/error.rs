//! Error handling for the carwash CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use carwash_core::error::{CarwashError, ErrorCategory as CoreCategory};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input caught before reaching the core.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A record named on the command line is not in the current data.
    #[error("No {kind} '{key}'")]
    UnknownRecord { kind: &'static str, key: String },

    /// Some services of an assignment batch failed.
    #[error("{failed} of {attempted} services could not be assigned to {plate}")]
    PartialBatch {
        plate: String,
        failed: usize,
        attempted: usize,
        retry: Vec<String>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `carwash-core` or an adapter.
    #[error(transparent)]
    Core(#[from] CarwashError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::UnknownRecord { kind, .. } => vec![
                format!("List the existing records: carwash {kind}s list"),
                "Keys are matched exactly; plates are case-sensitive".into(),
            ],

            Self::PartialBatch { plate, retry, .. } => {
                let flags: Vec<String> = retry.iter().map(|id| format!("-s {id}")).collect();
                vec![
                    "Services listed as assigned were kept".into(),
                    format!("Retry only the failed ones: carwash assign {plate} {}", flags.join(" ")),
                ]
            }

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Check the file shown by `carwash config path`".into(),
                "Use `carwash init --force` to write a fresh default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::PartialBatch { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::UnknownRecord { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Conflict => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Unavailable | CoreCategory::Incident | CoreCategory::Internal => {
                    ErrorCategory::Internal
                }
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    fn headline(&self) -> &'static str {
        match self {
            Self::Core(core) if core.is_incident() => "Billing incident:",
            _ => "Error:",
        }
    }

    /// The message, cause chain (verbose only) and suggestions, with ANSI styling.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Same layout as [`Self::format_colored`], without escape codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| -> String {
            if color { style(text) } else { text.to_owned() }
        };

        let mut out = format!(
            "\n{} {}\n",
            paint(self.headline(), |t: &str| t.red().bold().to_string()),
            paint(&self.to_string(), |t: &str| t.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let line = format!("caused by: {err}");
                out.push_str(&format!("  {}\n", paint(&line, |t: &str| t.dimmed().to_string())));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!(
                "\n{}\n",
                paint("Suggestions:", |t: &str| t.yellow().bold().to_string())
            ));
            for suggestion in &suggestions {
                out.push_str(&format!("  - {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!(
                "\n{}\n",
                paint("Run again with -v for details.", |t: &str| t.dimmed().to_string())
            ));
        }
        out
    }

    /// Emit one event at a severity matching the category.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, exit_code = self.exit_code(), "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, exit_code = self.exit_code(), "{self}")
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "underlying error");
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, conflicts, partial batches).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error, unreachable API, or billing incident.
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use carwash_core::application::{RepositoryError, Resource, WorkflowError};
    use carwash_core::domain::{DomainError, InvoiceId, Plate};
    use std::io;

    fn core(err: impl Into<CarwashError>) -> CliError {
        CliError::Core(err.into())
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn validation_and_conflict_exit_2() {
        let validation = core(DomainError::EmptyServiceSet);
        let conflict = core(RepositoryError::Conflict {
            resource: Resource::Client,
            key: "1".into(),
            reason: "owns vehicles".into(),
        });
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(conflict.exit_code(), 2);
    }

    #[test]
    fn not_found_exits_3() {
        let unknown = CliError::UnknownRecord {
            kind: "vehicle",
            key: "ZZZ".into(),
        };
        let remote = core(RepositoryError::NotFound {
            resource: Resource::Tariff,
            key: "9".into(),
        });
        assert_eq!(unknown.exit_code(), 3);
        assert_eq!(remote.exit_code(), 3);
    }

    #[test]
    fn configuration_exits_4() {
        let err = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn transport_incident_and_io_exit_1() {
        let transport = core(RepositoryError::Transport {
            resource: Resource::Client,
            reason: "connection refused".into(),
        });
        let incident = core(WorkflowError::InvoiceCreatedBillingIncomplete {
            invoice: InvoiceId::new(4),
            plate: Plate::new("ABC123").unwrap(),
            marked: vec![],
            pending: vec![],
        });
        let io = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("e"),
        };
        assert_eq!(transport.exit_code(), 1);
        assert_eq!(incident.exit_code(), 1);
        assert_eq!(io.exit_code(), 1);
    }

    #[test]
    fn partial_batch_suggests_retry_of_failures_only() {
        let err = CliError::PartialBatch {
            plate: "ABC123".into(),
            failed: 1,
            attempted: 3,
            retry: vec!["4".into()],
        };
        assert_eq!(err.exit_code(), 2);
        assert!(
            err.suggestions()
                .iter()
                .any(|s| s.ends_with("carwash assign ABC123 -s 4"))
        );
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn core_errors_are_displayed_unwrapped() {
        let err = core(DomainError::EmptyServiceSet);
        assert_eq!(err.to_string(), DomainError::EmptyServiceSet.to_string());
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::InvalidInput {
            message: "bad".into(),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error: Invalid input: bad"));
        assert!(s.contains("Suggestions:"));
    }

    #[test]
    fn incidents_get_their_own_headline() {
        let err = core(WorkflowError::InvoiceCreatedBillingIncomplete {
            invoice: InvoiceId::new(4),
            plate: Plate::new("ABC123").unwrap(),
            marked: vec![],
            pending: vec![],
        });
        assert!(err.format_plain(false).contains("Billing incident:"));
    }

    #[test]
    fn format_plain_verbose_omits_hint() {
        let s = CliError::Cancelled.format_plain(true);
        assert!(!s.contains("-v for details"));
        assert!(CliError::Cancelled.format_plain(false).contains("-v for details"));
    }

    #[test]
    fn verbose_output_walks_the_cause_chain() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("disk full"),
        };
        assert!(err.format_plain(true).contains("caused by: disk full"));
        assert!(!err.format_plain(false).contains("disk full"));
    }
}
