//! Snapshot Service - one consistent refresh of every list.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::{
    application::ports::Repositories,
    domain::{
        CarWashInvoice, CarWashService, Cedula, Client, ParkingInvoice, ParkingTariff, Plate,
        TariffId, Vehicle,
    },
    error::CarwashResult,
};

/// Everything the screens render, loaded together and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub vehicles: Vec<Vehicle>,
    pub tariffs: Vec<ParkingTariff>,
    pub services: Vec<CarWashService>,
    pub parking_invoices: Vec<ParkingInvoice>,
    pub car_wash_invoices: Vec<CarWashInvoice>,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn client(&self, cedula: Cedula) -> Option<&Client> {
        self.clients.iter().find(|c| c.cedula == cedula)
    }

    pub fn vehicle(&self, plate: &Plate) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &v.plate == plate)
    }

    pub fn tariff(&self, id: TariffId) -> Option<&ParkingTariff> {
        self.tariffs.iter().find(|t| t.id == id)
    }
}

pub struct SnapshotService {
    repos: Repositories,
}

impl SnapshotService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Fetch all lists concurrently. The first failure is returned as-is.
    #[instrument(skip_all)]
    pub async fn load(&self) -> CarwashResult<Snapshot> {
        let (clients, vehicles, tariffs, services, parking_invoices, car_wash_invoices) = tokio::try_join!(
            self.repos.clients.list(),
            self.repos.vehicles.list(),
            self.repos.tariffs.list(),
            self.repos.services.list(),
            self.repos.parking_invoices.list(),
            self.repos.car_wash_invoices.list(),
        )?;

        debug!(
            clients = clients.len(),
            vehicles = vehicles.len(),
            invoices = parking_invoices.len() + car_wash_invoices.len(),
            "Snapshot loaded"
        );

        Ok(Snapshot {
            clients,
            vehicles,
            tariffs,
            services,
            parking_invoices,
            car_wash_invoices,
            loaded_at: Utc::now(),
        })
    }
}
