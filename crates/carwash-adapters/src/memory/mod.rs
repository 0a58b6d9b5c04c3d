//! In-memory gateway for tests and offline use.
//!
//! Behaves like the REST collaborator: it assigns ids, enforces uniqueness
//! and referential constraints, and answers with the same error kinds. Faults
//! can be injected at the points where the billing workflows are fragile.

mod seed;

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use carwash_core::{
    application::{
        AssignmentRepository, CarWashInvoiceRepository, ClientRepository,
        ParkingInvoiceRepository, RepoResult, RepositoryError, Resource, ServiceRepository,
        TariffRepository, VehicleRepository,
    },
    domain::{
        AssignmentDraft, AssignmentId, CarWashInvoice, CarWashInvoiceDraft, CarWashService,
        Cedula, Client, ClientDraft, InvoiceId, ParkingInvoice, ParkingInvoiceDraft,
        ParkingTariff, Plate, ServiceAssignment, ServiceDraft, ServiceId, TariffDraft, TariffId,
        Vehicle, VehicleDraft,
    },
};
use tracing::debug;

/// Where an injected failure fires. Every injected failure is reported as a
/// transport error, the kind an operator would see for a dropped request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// Creating an assignment for this service.
    CreateAssignment(ServiceId),
    /// Marking this assignment billed.
    MarkBilled(AssignmentId),
    /// Persisting any car-wash invoice.
    CreateCarWashInvoice,
    /// Listing this resource.
    List(Resource),
}

#[derive(Debug, Default)]
struct Tables {
    clients: BTreeMap<Cedula, Client>,
    vehicles: BTreeMap<Plate, Vehicle>,
    tariffs: BTreeMap<TariffId, ParkingTariff>,
    services: BTreeMap<ServiceId, CarWashService>,
    assignments: BTreeMap<AssignmentId, ServiceAssignment>,
    parking_invoices: BTreeMap<InvoiceId, ParkingInvoice>,
    car_wash_invoices: BTreeMap<InvoiceId, CarWashInvoice>,
    last_id: u64,
    faults: HashSet<FailPoint>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn check(&self, point: FailPoint, resource: Resource) -> RepoResult<()> {
        if self.faults.contains(&point) {
            debug!(?point, "Injected failure");
            return Err(RepositoryError::Transport {
                resource,
                reason: format!("injected failure at {point:?}"),
            });
        }
        Ok(())
    }
}

/// Thread-safe in-process collaborator. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    inner: Arc<RwLock<Tables>>,
}

fn lock_error(resource: Resource) -> RepositoryError {
    RepositoryError::Transport {
        resource,
        reason: "in-memory store lock poisoned".into(),
    }
}

fn not_found(resource: Resource, key: impl ToString) -> RepositoryError {
    RepositoryError::NotFound {
        resource,
        key: key.to_string(),
    }
}

fn rejected(resource: Resource, reason: impl Into<String>) -> RepositoryError {
    RepositoryError::Validation {
        resource,
        reason: reason.into(),
    }
}

impl InMemoryGateway {
    /// Create a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway preloaded with a small demo catalog and customer base.
    pub fn with_demo_data() -> Self {
        let gateway = Self::new();
        if let Ok(mut tables) = gateway.inner.write() {
            seed::load(&mut tables);
        }
        gateway
    }

    /// Make every call reaching `point` fail until cleared.
    pub fn fail(&self, point: FailPoint) {
        if let Ok(mut tables) = self.inner.write() {
            tables.faults.insert(point);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut tables) = self.inner.write() {
            tables.faults.clear();
        }
    }

    /// Every assignment across all vehicles (testing helper).
    pub fn all_assignments(&self) -> Vec<ServiceAssignment> {
        self.inner
            .read()
            .map(|t| t.assignments.values().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self, resource: Resource) -> RepoResult<RwLockReadGuard<'_, Tables>> {
        self.inner.read().map_err(|_| lock_error(resource))
    }

    fn write(&self, resource: Resource) -> RepoResult<RwLockWriteGuard<'_, Tables>> {
        self.inner.write().map_err(|_| lock_error(resource))
    }

    fn list_of<T: Clone>(
        &self,
        resource: Resource,
        pick: impl FnOnce(&Tables) -> Vec<T>,
    ) -> RepoResult<Vec<T>> {
        let tables = self.read(resource)?;
        tables.check(FailPoint::List(resource), resource)?;
        Ok(pick(&tables))
    }
}

// ── Clients ──────────────────────────────────────────────────────────────────

#[async_trait]
impl ClientRepository for InMemoryGateway {
    async fn list(&self) -> RepoResult<Vec<Client>> {
        self.list_of(Resource::Client, |t| t.clients.values().cloned().collect())
    }

    async fn create(&self, draft: ClientDraft) -> RepoResult<Client> {
        let mut tables = self.write(Resource::Client)?;
        if tables.clients.contains_key(&draft.cedula) {
            return Err(rejected(
                Resource::Client,
                format!("a client with cedula {} already exists", draft.cedula),
            ));
        }
        let client = Client {
            cedula: draft.cedula,
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
        };
        tables.clients.insert(client.cedula, client.clone());
        Ok(client)
    }

    async fn update(&self, cedula: Cedula, draft: ClientDraft) -> RepoResult<Client> {
        let mut tables = self.write(Resource::Client)?;
        if draft.cedula != cedula {
            return Err(rejected(Resource::Client, "cedula cannot be changed"));
        }
        let client = tables
            .clients
            .get_mut(&cedula)
            .ok_or_else(|| not_found(Resource::Client, cedula))?;
        client.name = draft.name;
        client.phone = draft.phone;
        client.address = draft.address;
        Ok(client.clone())
    }

    async fn delete(&self, cedula: Cedula) -> RepoResult<()> {
        let mut tables = self.write(Resource::Client)?;
        if !tables.clients.contains_key(&cedula) {
            return Err(not_found(Resource::Client, cedula));
        }
        if tables.vehicles.values().any(|v| v.owner == cedula) {
            return Err(RepositoryError::Conflict {
                resource: Resource::Client,
                key: cedula.to_string(),
                reason: "the client still owns vehicles".into(),
            });
        }
        tables.clients.remove(&cedula);
        Ok(())
    }
}

// ── Vehicles ─────────────────────────────────────────────────────────────────

#[async_trait]
impl VehicleRepository for InMemoryGateway {
    async fn list(&self) -> RepoResult<Vec<Vehicle>> {
        self.list_of(Resource::Vehicle, |t| t.vehicles.values().cloned().collect())
    }

    /// The owner is not checked here; an unresolved owner is a display
    /// concern.
    async fn create(&self, draft: VehicleDraft) -> RepoResult<Vehicle> {
        let mut tables = self.write(Resource::Vehicle)?;
        if tables.vehicles.contains_key(&draft.plate) {
            return Err(rejected(
                Resource::Vehicle,
                format!("a vehicle with plate {} already exists", draft.plate),
            ));
        }
        let vehicle = Vehicle {
            plate: draft.plate,
            make: draft.make,
            model: draft.model,
            color: draft.color,
            owner: draft.owner,
        };
        tables
            .vehicles
            .insert(vehicle.plate.clone(), vehicle.clone());
        Ok(vehicle)
    }

    async fn update(&self, plate: &Plate, draft: VehicleDraft) -> RepoResult<Vehicle> {
        let mut tables = self.write(Resource::Vehicle)?;
        if &draft.plate != plate {
            return Err(rejected(Resource::Vehicle, "plate cannot be changed"));
        }
        let vehicle = tables
            .vehicles
            .get_mut(plate)
            .ok_or_else(|| not_found(Resource::Vehicle, plate))?;
        vehicle.make = draft.make;
        vehicle.model = draft.model;
        vehicle.color = draft.color;
        vehicle.owner = draft.owner;
        Ok(vehicle.clone())
    }

    async fn delete(&self, plate: &Plate) -> RepoResult<()> {
        let mut tables = self.write(Resource::Vehicle)?;
        tables
            .vehicles
            .remove(plate)
            .map(|_| ())
            .ok_or_else(|| not_found(Resource::Vehicle, plate))
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[async_trait]
impl TariffRepository for InMemoryGateway {
    async fn list(&self) -> RepoResult<Vec<ParkingTariff>> {
        self.list_of(Resource::Tariff, |t| t.tariffs.values().cloned().collect())
    }

    async fn create(&self, draft: TariffDraft) -> RepoResult<ParkingTariff> {
        let mut tables = self.write(Resource::Tariff)?;
        let tariff = ParkingTariff {
            id: TariffId::new(tables.next_id()),
            vehicle_type: draft.vehicle_type,
            hourly_rate: draft.hourly_rate,
            fraction: draft.fraction,
        };
        tables.tariffs.insert(tariff.id, tariff.clone());
        Ok(tariff)
    }

    async fn update(&self, id: TariffId, draft: TariffDraft) -> RepoResult<ParkingTariff> {
        let mut tables = self.write(Resource::Tariff)?;
        let tariff = tables
            .tariffs
            .get_mut(&id)
            .ok_or_else(|| not_found(Resource::Tariff, id))?;
        tariff.vehicle_type = draft.vehicle_type;
        tariff.hourly_rate = draft.hourly_rate;
        tariff.fraction = draft.fraction;
        Ok(tariff.clone())
    }

    async fn delete(&self, id: TariffId) -> RepoResult<()> {
        let mut tables = self.write(Resource::Tariff)?;
        if !tables.tariffs.contains_key(&id) {
            return Err(not_found(Resource::Tariff, id));
        }
        if tables.parking_invoices.values().any(|i| i.tariff_id == id) {
            return Err(RepositoryError::Conflict {
                resource: Resource::Tariff,
                key: id.to_string(),
                reason: "parking invoices reference this tariff".into(),
            });
        }
        tables.tariffs.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ServiceRepository for InMemoryGateway {
    async fn list(&self) -> RepoResult<Vec<CarWashService>> {
        self.list_of(Resource::Service, |t| t.services.values().cloned().collect())
    }

    async fn create(&self, draft: ServiceDraft) -> RepoResult<CarWashService> {
        let mut tables = self.write(Resource::Service)?;
        let service = CarWashService {
            id: ServiceId::new(tables.next_id()),
            name: draft.name,
            description: draft.description,
            tariff: draft.tariff,
        };
        tables.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn update(&self, id: ServiceId, draft: ServiceDraft) -> RepoResult<CarWashService> {
        let mut tables = self.write(Resource::Service)?;
        let service = tables
            .services
            .get_mut(&id)
            .ok_or_else(|| not_found(Resource::Service, id))?;
        service.name = draft.name;
        service.description = draft.description;
        service.tariff = draft.tariff;
        Ok(service.clone())
    }

    async fn delete(&self, id: ServiceId) -> RepoResult<()> {
        let mut tables = self.write(Resource::Service)?;
        if !tables.services.contains_key(&id) {
            return Err(not_found(Resource::Service, id));
        }
        if tables
            .assignments
            .values()
            .any(|a| a.service_id == id && !a.billed)
        {
            return Err(RepositoryError::Conflict {
                resource: Resource::Service,
                key: id.to_string(),
                reason: "unbilled assignments reference this service".into(),
            });
        }
        tables.services.remove(&id);
        Ok(())
    }
}

// ── Assignments ──────────────────────────────────────────────────────────────

#[async_trait]
impl AssignmentRepository for InMemoryGateway {
    async fn list_for_vehicle(&self, plate: &Plate) -> RepoResult<Vec<ServiceAssignment>> {
        let tables = self.read(Resource::Assignment)?;
        tables.check(FailPoint::List(Resource::Assignment), Resource::Assignment)?;
        if !tables.vehicles.contains_key(plate) {
            return Err(not_found(Resource::Vehicle, plate));
        }
        Ok(tables
            .assignments
            .values()
            .filter(|a| &a.plate == plate)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        plate: &Plate,
        draft: AssignmentDraft,
    ) -> RepoResult<ServiceAssignment> {
        let resource = Resource::Assignment;
        let mut tables = self.write(resource)?;
        tables.check(FailPoint::CreateAssignment(draft.service_id), resource)?;

        if !tables.vehicles.contains_key(plate) {
            return Err(not_found(Resource::Vehicle, plate));
        }
        if !tables.services.contains_key(&draft.service_id) {
            return Err(rejected(
                resource,
                format!("service {} does not exist", draft.service_id),
            ));
        }
        if tables
            .assignments
            .values()
            .any(|a| &a.plate == plate && a.service_id == draft.service_id && !a.billed)
        {
            return Err(rejected(
                resource,
                format!(
                    "service {} is already pending for vehicle {plate}",
                    draft.service_id
                ),
            ));
        }

        let assignment = ServiceAssignment {
            id: AssignmentId::new(tables.next_id()),
            plate: plate.clone(),
            service_id: draft.service_id,
            performed_at: draft.performed_at,
            billed: false,
        };
        tables.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn mark_billed(&self, plate: &Plate, id: AssignmentId) -> RepoResult<ServiceAssignment> {
        let resource = Resource::Assignment;
        let mut tables = self.write(resource)?;
        tables.check(FailPoint::MarkBilled(id), resource)?;

        match tables.assignments.get_mut(&id) {
            Some(assignment) if &assignment.plate == plate => {
                assignment.billed = true;
                Ok(assignment.clone())
            }
            _ => Err(not_found(resource, id)),
        }
    }
}

// ── Invoices ─────────────────────────────────────────────────────────────────

#[async_trait]
impl ParkingInvoiceRepository for InMemoryGateway {
    async fn list(&self) -> RepoResult<Vec<ParkingInvoice>> {
        self.list_of(Resource::ParkingInvoice, |t| {
            t.parking_invoices.values().cloned().collect()
        })
    }

    async fn create(&self, draft: ParkingInvoiceDraft) -> RepoResult<ParkingInvoice> {
        let resource = Resource::ParkingInvoice;
        let mut tables = self.write(resource)?;
        if !tables.tariffs.contains_key(&draft.tariff_id) {
            return Err(rejected(
                resource,
                format!("tariff {} does not exist", draft.tariff_id),
            ));
        }
        if let Some(existing) = tables
            .parking_invoices
            .values()
            .find(|i| i.ticket_id == draft.ticket_id)
        {
            return Err(RepositoryError::Conflict {
                resource,
                key: draft.ticket_id.to_string(),
                reason: format!("ticket already invoiced as {}", existing.id),
            });
        }

        let invoice = ParkingInvoice {
            id: InvoiceId::new(tables.next_id()),
            ticket_id: draft.ticket_id,
            tariff_id: draft.tariff_id,
            exit_time: draft.exit_time,
            total: draft.total,
            issued_at: draft.issued_at,
        };
        tables.parking_invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }
}

#[async_trait]
impl CarWashInvoiceRepository for InMemoryGateway {
    async fn list(&self) -> RepoResult<Vec<CarWashInvoice>> {
        self.list_of(Resource::CarWashInvoice, |t| {
            t.car_wash_invoices.values().cloned().collect()
        })
    }

    async fn create(&self, draft: CarWashInvoiceDraft) -> RepoResult<CarWashInvoice> {
        let resource = Resource::CarWashInvoice;
        let mut tables = self.write(resource)?;
        tables.check(FailPoint::CreateCarWashInvoice, resource)?;
        if draft.services.is_empty() {
            return Err(rejected(resource, "an invoice needs at least one service"));
        }

        let invoice = CarWashInvoice {
            id: InvoiceId::new(tables.next_id()),
            client: draft.client,
            plate: draft.plate,
            services: draft.services,
            total: draft.total,
            issued_at: draft.issued_at,
        };
        tables.car_wash_invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }
}
