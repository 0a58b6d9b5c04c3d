// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for the car-wash and parking billing system.
//!
//! This module contains pure business logic. All network and presentation
//! concerns are handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No network, clock or external calls (callers pass timestamps in)
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//! - **Single pricing path**: Every persisted total comes from [`pricing`]
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod pricing;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    AssignmentDraft, CarWashInvoice, CarWashInvoiceDraft, CarWashService, Client, ClientDraft,
    ParkingInvoice, ParkingInvoiceDraft, ParkingTariff, ParkingTicket, ServiceAssignment,
    ServiceDraft, ServiceSnapshot, TariffDraft, Vehicle, VehicleDraft,
};

pub use error::DomainError;

pub use value_objects::{AssignmentId, Cedula, InvoiceId, Plate, ServiceId, TariffId, TicketId};

pub use validation::DomainValidator;
