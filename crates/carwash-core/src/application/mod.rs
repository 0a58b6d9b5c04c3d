//! Application layer for the billing core.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (assignment, invoicing, records)
//! - **Ports**: Interface definitions (traits) for the remote collaborator
//! - **Views**: Pure queries that turn a snapshot into renderable rows
//! - **Errors**: Repository and workflow error types
//!
//! The application layer coordinates the domain layer but contains no
//! pricing logic itself. All billing arithmetic lives in `crate::domain`.

pub mod error;
pub mod forms;
pub mod ports;
pub mod services;
pub mod views;

// Re-export main services
pub use services::{
    AssignmentCoordinator, BatchOutcome, BatchState, FailedAssignment, InvoiceGenerator,
    KeyedLocks, RecordService, Snapshot, SnapshotService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    AssignmentRepository, CarWashInvoiceRepository, ClientRepository, ParkingInvoiceRepository,
    Repositories, ServiceRepository, TariffRepository, VehicleRepository,
};

pub use error::{PendingBilling, RepoResult, RepositoryError, Resource, WorkflowError};
pub use forms::{CatalogDraft, FormDraft, SavedRecord};
