//! Billing core for a car wash with a parking lot.
//!
//! [`domain`] holds the records, their keys and the pricing rules; it does
//! no I/O. [`application`] defines one repository port per API resource and
//! the services built on them: batch assignment, invoice generation, record
//! editing and the fan-out snapshot used by every listing. Adapters live in
//! `carwash-adapters`.
//!
//! ```text
//!   carwash-cli ──► application services ──► ports ◄── carwash-adapters
//!                          │
//!                          ▼
//!                        domain
//! ```
//!
//! ```rust,ignore
//! use carwash_core::prelude::*;
//!
//! let repos = Repositories::from_gateway(gateway);
//! let locks = KeyedLocks::new();
//!
//! let outcome = repos.coordinator(&locks).assign(&vehicle, &[ServiceId::new(1)]).await?;
//! let invoice = repos.generator(&locks).generate_car_wash_invoice(&vehicle).await?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// The names the CLI and adapters import.
pub mod prelude {
    pub use crate::application::{
        AssignmentCoordinator, BatchOutcome, BatchState, CatalogDraft, FormDraft,
        InvoiceGenerator, KeyedLocks, RecordService, Repositories, RepositoryError, Resource,
        SavedRecord, Snapshot, SnapshotService, WorkflowError, views,
    };
    pub use crate::domain::{
        AssignmentId, CarWashInvoice, CarWashService, Cedula, Client, ClientDraft, InvoiceId,
        ParkingInvoice, ParkingTariff, ParkingTicket, Plate, ServiceAssignment, ServiceDraft,
        ServiceId, TariffDraft, TariffId, TicketId, Vehicle, VehicleDraft, pricing,
    };
    pub use crate::error::{CarwashError, CarwashResult, ErrorCategory};
}
