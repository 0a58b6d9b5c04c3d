//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "assign these services" or "invoice this car".

pub mod assignment_coordinator;
pub mod invoice_generator;
pub mod locks;
pub mod records;
pub mod snapshot;

pub use assignment_coordinator::{
    AssignmentCoordinator, BatchOutcome, BatchState, FailedAssignment,
};
pub use invoice_generator::InvoiceGenerator;
pub use locks::KeyedLocks;
pub use records::RecordService;
pub use snapshot::{Snapshot, SnapshotService};
