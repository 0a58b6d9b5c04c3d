//! Record Service - staff CRUD for clients, vehicles and the catalog.
//!
//! Drafts are validated before anything is sent. Natural keys (cedula,
//! plate) are immutable: an edit that changes one is rejected instead of
//! silently creating a second record.

use tracing::{info, instrument, warn};

use crate::{
    application::{
        RepositoryError, Resource,
        forms::{CatalogDraft, FormDraft, SavedRecord},
        ports::Repositories,
    },
    domain::{
        CarWashService, Cedula, Client, ClientDraft, DomainError, DomainValidator as validator,
        ParkingTariff, Plate, ServiceDraft, ServiceId, TariffDraft, TariffId, Vehicle,
        VehicleDraft,
    },
    error::CarwashResult,
};

/// Service for record maintenance.
pub struct RecordService {
    repos: Repositories,
}

impl RecordService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    // ── Forms ────────────────────────────────────────────────────────────────

    /// Create whatever record the form was opened for.
    pub async fn create_record(&self, form: FormDraft) -> CarwashResult<SavedRecord> {
        match form {
            FormDraft::Client(draft) => self.create_client(draft).await.map(SavedRecord::Client),
            FormDraft::Vehicle(draft) => {
                self.create_vehicle(draft).await.map(SavedRecord::Vehicle)
            }
        }
    }

    pub async fn create_catalog_entry(&self, form: CatalogDraft) -> CarwashResult<SavedRecord> {
        match form {
            CatalogDraft::Tariff(draft) => self.create_tariff(draft).await.map(SavedRecord::Tariff),
            CatalogDraft::Service(draft) => {
                self.create_service(draft).await.map(SavedRecord::Service)
            }
        }
    }

    // ── Clients ──────────────────────────────────────────────────────────────

    #[instrument(skip_all, fields(cedula = %draft.cedula))]
    pub async fn create_client(&self, draft: ClientDraft) -> CarwashResult<Client> {
        validator::validate_client(&draft)?;
        let client = self.repos.clients.create(draft).await?;
        info!("Client created");
        Ok(client)
    }

    #[instrument(skip_all, fields(cedula = %cedula))]
    pub async fn update_client(&self, cedula: Cedula, draft: ClientDraft) -> CarwashResult<Client> {
        if draft.cedula != cedula {
            return Err(DomainError::ImmutableKey {
                key: "Cedula",
                from: cedula.to_string(),
                to: draft.cedula.to_string(),
            }
            .into());
        }
        validator::validate_client(&draft)?;
        Ok(self.repos.clients.update(cedula, draft).await?)
    }

    /// Delete a client that owns no vehicles.
    #[instrument(skip_all, fields(cedula = %cedula))]
    pub async fn delete_client(&self, cedula: Cedula) -> CarwashResult<()> {
        let owned: Vec<String> = self
            .repos
            .vehicles
            .list()
            .await?
            .into_iter()
            .filter(|v| v.owner == cedula)
            .map(|v| v.plate.to_string())
            .collect();

        if !owned.is_empty() {
            warn!(vehicles = ?owned, "Client still owns vehicles");
            return Err(RepositoryError::Conflict {
                resource: Resource::Client,
                key: cedula.to_string(),
                reason: format!("still owns vehicle(s) {}", owned.join(", ")),
            }
            .into());
        }

        self.repos.clients.delete(cedula).await?;
        info!("Client deleted");
        Ok(())
    }

    // ── Vehicles ─────────────────────────────────────────────────────────────

    #[instrument(skip_all, fields(plate = %draft.plate))]
    pub async fn create_vehicle(&self, draft: VehicleDraft) -> CarwashResult<Vehicle> {
        validator::validate_vehicle(&draft)?;
        let vehicle = self.repos.vehicles.create(draft).await?;
        info!("Vehicle created");
        Ok(vehicle)
    }

    #[instrument(skip_all, fields(plate = %plate))]
    pub async fn update_vehicle(&self, plate: &Plate, draft: VehicleDraft) -> CarwashResult<Vehicle> {
        if &draft.plate != plate {
            return Err(DomainError::ImmutableKey {
                key: "Placa",
                from: plate.to_string(),
                to: draft.plate.to_string(),
            }
            .into());
        }
        validator::validate_vehicle(&draft)?;
        Ok(self.repos.vehicles.update(plate, draft).await?)
    }

    #[instrument(skip_all, fields(plate = %plate))]
    pub async fn delete_vehicle(&self, plate: &Plate) -> CarwashResult<()> {
        self.repos.vehicles.delete(plate).await?;
        info!("Vehicle deleted");
        Ok(())
    }

    // ── Tariffs ──────────────────────────────────────────────────────────────

    pub async fn create_tariff(&self, draft: TariffDraft) -> CarwashResult<ParkingTariff> {
        validator::validate_tariff(&draft)?;
        let tariff = self.repos.tariffs.create(draft).await?;
        info!(tariff = %tariff.id, "Tariff created");
        Ok(tariff)
    }

    pub async fn update_tariff(
        &self,
        id: TariffId,
        draft: TariffDraft,
    ) -> CarwashResult<ParkingTariff> {
        validator::validate_tariff(&draft)?;
        Ok(self.repos.tariffs.update(id, draft).await?)
    }

    pub async fn delete_tariff(&self, id: TariffId) -> CarwashResult<()> {
        self.repos.tariffs.delete(id).await?;
        info!(tariff = %id, "Tariff deleted");
        Ok(())
    }

    // ── Services ─────────────────────────────────────────────────────────────

    pub async fn create_service(&self, draft: ServiceDraft) -> CarwashResult<CarWashService> {
        validator::validate_service(&draft)?;
        let service = self.repos.services.create(draft).await?;
        info!(service = %service.id, "Service created");
        Ok(service)
    }

    /// Price edits apply to future assignments only.
    pub async fn update_service(
        &self,
        id: ServiceId,
        draft: ServiceDraft,
    ) -> CarwashResult<CarWashService> {
        validator::validate_service(&draft)?;
        Ok(self.repos.services.update(id, draft).await?)
    }

    pub async fn delete_service(&self, id: ServiceId) -> CarwashResult<()> {
        self.repos.services.delete(id).await?;
        info!(service = %id, "Service deleted");
        Ok(())
    }
}
