//! Unified error handling for the billing core.
//!
//! This module provides a unified error type that wraps domain, repository
//! and workflow errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::{RepositoryError, WorkflowError};
use crate::domain::DomainError;

/// Root error type for core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CarwashError {
    /// Invariant violations raised by pure domain code.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// A repository call failed; propagated unchanged.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// A billing workflow invariant was violated.
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CarwashError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Repository(e) => e.suggestions(),
            Self::Workflow(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run `carwash config list` to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug; please report it".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Repository(e) => e.category(),
            Self::Workflow(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the operator may re-issue the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_retryable())
    }

    /// Whether the persisted state needs manual reconciliation.
    pub fn is_incident(&self) -> bool {
        matches!(
            self,
            Self::Workflow(WorkflowError::InvoiceCreatedBillingIncomplete { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Unavailable,
    Incident,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CarwashResult<T> = Result<T, CarwashError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> CarwashResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> CarwashResult<T> {
        self.map_err(|e| CarwashError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Resource;
    use crate::domain::{InvoiceId, Plate};

    #[test]
    fn domain_errors_are_validation() {
        let err = CarwashError::from(DomainError::EmptyServiceSet);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_is_retryable_and_unavailable() {
        let err = CarwashError::from(RepositoryError::Transport {
            resource: Resource::Vehicle,
            reason: "connection refused".into(),
        });
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Unavailable);
    }

    #[test]
    fn billing_incomplete_is_the_only_incident() {
        let incident = CarwashError::from(WorkflowError::InvoiceCreatedBillingIncomplete {
            invoice: InvoiceId::new(1),
            plate: Plate::new("A1").unwrap(),
            marked: vec![],
            pending: vec![],
        });
        let other = CarwashError::from(WorkflowError::NoUnbilledAssignments {
            plate: Plate::new("A1").unwrap(),
        });
        assert!(incident.is_incident());
        assert!(!other.is_incident());
    }

    #[test]
    fn context_wraps_foreign_errors_as_internal() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = res.context("writing receipt").unwrap_err();
        assert!(matches!(err, CarwashError::Internal { .. }));
        assert!(err.to_string().contains("writing receipt: boom"));
    }
}
