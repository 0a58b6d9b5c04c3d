//! Application layer errors.
//!
//! Two families live here:
//!
//! - [`RepositoryError`]: what a driven port reports about one entity call.
//!   These propagate unchanged into workflows and batch outcomes.
//! - [`WorkflowError`]: billing workflow invariants the services enforce.
//!
//! Pure invariant violations are `DomainError` from `crate::domain`.

use std::fmt;

use thiserror::Error;

use crate::domain::{AssignmentId, InvoiceId, Plate, ServiceId, TicketId};
use crate::error::ErrorCategory;

/// Convenient result type for port implementations.
pub type RepoResult<T> = Result<T, RepositoryError>;

/// The collaborator resource a repository call touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Client,
    Vehicle,
    Tariff,
    Service,
    Assignment,
    ParkingInvoice,
    CarWashInvoice,
}

impl Resource {
    /// Collection path on the collaborator. Assignments are nested under a
    /// vehicle, so only the trailing segment is returned for them.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Client => "clientes",
            Self::Vehicle => "vehiculos",
            Self::Tariff => "tarifas_parking",
            Self::Service => "servicios_car_wash",
            Self::Assignment => "servicios",
            Self::ParkingInvoice => "facturas_parking",
            Self::CarWashInvoice => "facturas_car_wash",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Vehicle => "vehicle",
            Self::Tariff => "parking tariff",
            Self::Service => "car-wash service",
            Self::Assignment => "service assignment",
            Self::ParkingInvoice => "parking invoice",
            Self::CarWashInvoice => "car-wash invoice",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Repository errors
// ============================================================================

/// Failure of a single repository call.
///
/// Cloneable so it can be stored per item in an assignment batch outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Network failure, timeout or 5xx.
    #[error("Could not reach the API ({resource}): {reason}")]
    Transport { resource: Resource, reason: String },

    /// The response did not have the expected shape.
    #[error("Unexpected {resource} payload: {reason}")]
    Decode { resource: Resource, reason: String },

    /// The collaborator rejected the payload (duplicate key, bad field...).
    #[error("The API rejected the {resource}: {reason}")]
    Validation { resource: Resource, reason: String },

    #[error("No {resource} '{key}'")]
    NotFound { resource: Resource, key: String },

    /// A referential constraint blocked the change.
    #[error("Cannot change {resource} '{key}': {reason}")]
    Conflict {
        resource: Resource,
        key: String,
        reason: String,
    },
}

impl RepositoryError {
    pub fn resource(&self) -> Resource {
        match self {
            Self::Transport { resource, .. }
            | Self::Decode { resource, .. }
            | Self::Validation { resource, .. }
            | Self::NotFound { resource, .. }
            | Self::Conflict { resource, .. } => *resource,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Transport { .. } => vec![
                "Check your network connection and the api.base_url setting".into(),
                "The request can be repeated safely once the API is reachable".into(),
            ],
            Self::Decode { .. } => vec![
                "The API answered with data this version does not understand".into(),
                "Check that api.base_url points at the car-wash API".into(),
            ],
            Self::Validation { resource, .. } => vec![
                format!("Review the {resource} fields and try again"),
                "Keys such as cedula and plate must be unique".into(),
            ],
            Self::NotFound { resource, .. } => vec![
                format!("The {resource} may have been deleted; refresh the list"),
            ],
            Self::Conflict { resource, .. } => vec![
                format!("Remove the records that still reference this {resource} first"),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Unavailable,
            Self::Decode { .. } => ErrorCategory::Internal,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
        }
    }

    /// Only transport failures are safe to re-issue as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

// ============================================================================
// Workflow errors
// ============================================================================

/// An assignment that stayed unbilled after its invoice was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBilling {
    pub assignment: AssignmentId,
    pub reason: String,
}

/// Violations of the assignment and invoicing workflows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("No services selected for vehicle {plate}")]
    NoServicesSelected { plate: Plate },

    #[error("Service {service_id} is selected more than once for vehicle {plate}")]
    DuplicateServiceSelection { plate: Plate, service_id: ServiceId },

    #[error("Vehicle {plate} has no unbilled services")]
    NoUnbilledAssignments { plate: Plate },

    #[error("Assignment {assignment_id} on {plate} references unknown service {service_id}")]
    UnknownService {
        plate: Plate,
        assignment_id: AssignmentId,
        service_id: ServiceId,
    },

    #[error("Ticket {ticket} was already invoiced as invoice {invoice}")]
    TicketAlreadyInvoiced { ticket: TicketId, invoice: InvoiceId },

    /// The invoice exists but some of its assignments are still unbilled.
    /// Needs manual reconciliation; repeating the request would double-bill.
    #[error(
        "Invoice {invoice} was created for {plate} but {} assignment(s) could not be marked billed",
        .pending.len()
    )]
    InvoiceCreatedBillingIncomplete {
        invoice: InvoiceId,
        plate: Plate,
        marked: Vec<AssignmentId>,
        pending: Vec<PendingBilling>,
    },
}

impl WorkflowError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoServicesSelected { .. } => {
                vec!["Pass at least one --service <ID>".into()]
            }
            Self::DuplicateServiceSelection { service_id, .. } => {
                vec![format!("Select service {service_id} only once")]
            }
            Self::NoUnbilledAssignments { plate } => vec![
                format!("Assign services to {plate} before invoicing"),
                "Every performed service has already been invoiced".into(),
            ],
            Self::UnknownService { service_id, .. } => vec![
                format!("Service {service_id} no longer exists in the catalog"),
                "Recreate the service or remove the assignment on the API".into(),
            ],
            Self::TicketAlreadyInvoiced { invoice, .. } => {
                vec![format!("Look up invoice {invoice} instead of issuing a new one")]
            }
            Self::InvoiceCreatedBillingIncomplete {
                invoice, pending, ..
            } => {
                let mut out = vec![
                    format!("Invoice {invoice} is valid; do not generate it again"),
                    "Mark these assignments as billed on the API:".into(),
                ];
                out.extend(
                    pending
                        .iter()
                        .map(|p| format!("  assignment {}: {}", p.assignment, p.reason)),
                );
                out
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoServicesSelected { .. }
            | Self::DuplicateServiceSelection { .. }
            | Self::NoUnbilledAssignments { .. } => ErrorCategory::Validation,
            Self::UnknownService { .. } => ErrorCategory::NotFound,
            Self::TicketAlreadyInvoiced { .. } => ErrorCategory::Conflict,
            Self::InvoiceCreatedBillingIncomplete { .. } => ErrorCategory::Incident,
        }
    }
}
