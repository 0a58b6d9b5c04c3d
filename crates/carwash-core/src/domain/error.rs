// ============================================================================
// domain/error.rs - INVARIANT VIOLATIONS
// ============================================================================

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Root domain error type.
///
/// Raised only by pure code (draft validation, pricing). All errors are:
/// - Cloneable (they travel inside batch outcomes)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Draft validation (staff input)
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("{key} cannot be changed (was '{from}', got '{to}')")]
    ImmutableKey {
        key: &'static str,
        from: String,
        to: String,
    },

    // ========================================================================
    // Pricing
    // ========================================================================
    #[error("Invalid tariff: {reason}")]
    InvalidTariff { reason: String },

    #[error("Invalid parking duration: exit {exit} is not after entry {entry}")]
    InvalidDuration {
        entry: DateTime<Utc>,
        exit: DateTime<Utc>,
    },

    #[error("An invoice needs at least one service line")]
    EmptyServiceSet,

    #[error("Amount out of range: {reason}")]
    AmountOutOfRange { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("'{field}' must not be empty"),
                "Fill in every field of the form and try again".into(),
            ],
            Self::InvalidField { field, reason } => {
                vec![format!("Fix '{field}': {reason}")]
            }
            Self::ImmutableKey { key, .. } => vec![
                format!("{key} identifies the record and cannot be edited"),
                "Delete the record and create a new one instead".into(),
            ],
            Self::InvalidTariff { reason } => vec![
                format!("Tariff rejected: {reason}"),
                "The billing fraction must be greater than zero".into(),
            ],
            Self::InvalidDuration { .. } => vec![
                "Check the ticket's entry time and the exit time".into(),
                "The exit must be strictly after the entry".into(),
            ],
            Self::EmptyServiceSet => vec!["Assign at least one service first".into()],
            Self::AmountOutOfRange { .. } => vec![
                "Check the tariff's hourly rate and fraction, or the service prices".into(),
                "Amounts this large cannot be billed".into(),
            ],
        }
    }
}
