pub mod assignment;
pub mod catalog;
pub mod client;
pub mod invoice;
pub mod vehicle;

pub use crate::domain::DomainError;
pub use assignment::{AssignmentDraft, ServiceAssignment};
pub use catalog::{CarWashService, ParkingTariff, ServiceDraft, TariffDraft};
pub use client::{Client, ClientDraft};
pub use invoice::{
    CarWashInvoice, CarWashInvoiceDraft, ParkingInvoice, ParkingInvoiceDraft, ParkingTicket,
    ServiceSnapshot,
};
pub use vehicle::{Vehicle, VehicleDraft};
