//! Driven (output) ports - implemented by infrastructure.
//!
//! One repository per collaborator entity. The `carwash-adapters` crate
//! provides an HTTP implementation and an in-memory one; both implement every
//! trait on a single gateway type, which [`Repositories::from_gateway`] fans
//! out into trait objects.
//!
//! ## Contract
//!
//! - Every call goes to the collaborator; nothing is cached.
//! - A write is visible only after the collaborator acknowledged it.
//! - Errors are reported, never retried: `create` in particular is not
//!   idempotent on the remote side.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::error::RepoResult;
use crate::application::services::{
    AssignmentCoordinator, InvoiceGenerator, KeyedLocks, RecordService, SnapshotService,
};
use crate::domain::{
    AssignmentDraft, AssignmentId, CarWashInvoice, CarWashInvoiceDraft, CarWashService, Cedula,
    Client, ClientDraft, ParkingInvoice, ParkingInvoiceDraft, ParkingTariff, Plate,
    ServiceAssignment, ServiceDraft, ServiceId, TariffDraft, TariffId, Vehicle, VehicleDraft,
};

/// Port for client records, keyed by cedula.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<Client>>;

    /// Fails with `Validation` when the cedula is already taken.
    async fn create(&self, draft: ClientDraft) -> RepoResult<Client>;

    async fn update(&self, cedula: Cedula, draft: ClientDraft) -> RepoResult<Client>;

    /// Fails with `Conflict` while vehicles still reference the client.
    async fn delete(&self, cedula: Cedula) -> RepoResult<()>;
}

/// Port for vehicle records, keyed by plate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<Vehicle>>;

    async fn create(&self, draft: VehicleDraft) -> RepoResult<Vehicle>;

    async fn update(&self, plate: &Plate, draft: VehicleDraft) -> RepoResult<Vehicle>;

    async fn delete(&self, plate: &Plate) -> RepoResult<()>;
}

/// Port for parking tariffs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TariffRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<ParkingTariff>>;

    async fn create(&self, draft: TariffDraft) -> RepoResult<ParkingTariff>;

    async fn update(&self, id: TariffId, draft: TariffDraft) -> RepoResult<ParkingTariff>;

    async fn delete(&self, id: TariffId) -> RepoResult<()>;
}

/// Port for the car-wash service catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<CarWashService>>;

    async fn create(&self, draft: ServiceDraft) -> RepoResult<CarWashService>;

    async fn update(&self, id: ServiceId, draft: ServiceDraft) -> RepoResult<CarWashService>;

    async fn delete(&self, id: ServiceId) -> RepoResult<()>;
}

/// Port for services performed on a vehicle.
///
/// There is deliberately no way to reset `billed`: the transition is one-way.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn list_for_vehicle(&self, plate: &Plate) -> RepoResult<Vec<ServiceAssignment>>;

    async fn create(&self, plate: &Plate, draft: AssignmentDraft)
    -> RepoResult<ServiceAssignment>;

    async fn mark_billed(&self, plate: &Plate, id: AssignmentId) -> RepoResult<ServiceAssignment>;
}

/// Port for parking invoices. Invoices are immutable once created.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkingInvoiceRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<ParkingInvoice>>;

    async fn create(&self, draft: ParkingInvoiceDraft) -> RepoResult<ParkingInvoice>;
}

/// Port for car-wash invoices. Invoices are immutable once created.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarWashInvoiceRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<CarWashInvoice>>;

    async fn create(&self, draft: CarWashInvoiceDraft) -> RepoResult<CarWashInvoice>;
}

// ============================================================================
// Bundle
// ============================================================================

/// Every repository the services need, as shared trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub clients: Arc<dyn ClientRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub tariffs: Arc<dyn TariffRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub parking_invoices: Arc<dyn ParkingInvoiceRepository>,
    pub car_wash_invoices: Arc<dyn CarWashInvoiceRepository>,
}

impl Repositories {
    /// Use one gateway that implements every port.
    pub fn from_gateway<G>(gateway: Arc<G>) -> Self
    where
        G: ClientRepository
            + VehicleRepository
            + TariffRepository
            + ServiceRepository
            + AssignmentRepository
            + ParkingInvoiceRepository
            + CarWashInvoiceRepository
            + 'static,
    {
        Self {
            clients: gateway.clone(),
            vehicles: gateway.clone(),
            tariffs: gateway.clone(),
            services: gateway.clone(),
            assignments: gateway.clone(),
            parking_invoices: gateway.clone(),
            car_wash_invoices: gateway,
        }
    }

    pub fn coordinator(&self, locks: &KeyedLocks) -> AssignmentCoordinator {
        AssignmentCoordinator::new(self.assignments.clone(), locks.clone())
    }

    pub fn generator(&self, locks: &KeyedLocks) -> InvoiceGenerator {
        InvoiceGenerator::new(self.clone(), locks.clone())
    }

    pub fn records(&self) -> RecordService {
        RecordService::new(self.clone())
    }

    pub fn snapshots(&self) -> SnapshotService {
        SnapshotService::new(self.clone())
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
