//! Traits the services depend on and the adapters implement.
//!
//! Every port is driven: the application calls out through it. There is
//! one repository per API resource, bundled for the services by
//! [`Repositories`].

pub mod output;

pub use output::{
    AssignmentRepository, CarWashInvoiceRepository, ClientRepository, ParkingInvoiceRepository,
    Repositories, ServiceRepository, TariffRepository, VehicleRepository,
};
