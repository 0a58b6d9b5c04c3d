//! Tagged form payloads.
//!
//! A form knows what it edits from the moment it is opened; the kind is never
//! guessed from which fields happen to be filled in.

use crate::domain::{
    CarWashService, Client, ClientDraft, DomainError, ParkingTariff, ServiceDraft, TariffDraft,
    Vehicle, VehicleDraft,
};

/// A client or vehicle form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDraft {
    Client(ClientDraft),
    Vehicle(VehicleDraft),
}

impl FormDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Client(draft) => draft.validate(),
            Self::Vehicle(draft) => draft.validate(),
        }
    }

    /// The natural key the form is bound to.
    pub fn key(&self) -> String {
        match self {
            Self::Client(draft) => draft.cedula.to_string(),
            Self::Vehicle(draft) => draft.plate.to_string(),
        }
    }
}

/// A tariff or service form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogDraft {
    Tariff(TariffDraft),
    Service(ServiceDraft),
}

impl CatalogDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Tariff(draft) => draft.validate(),
            Self::Service(draft) => draft.validate(),
        }
    }
}

/// Whatever a form submission persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedRecord {
    Client(Client),
    Vehicle(Vehicle),
    Tariff(ParkingTariff),
    Service(CarWashService),
}

impl SavedRecord {
    pub fn describe(&self) -> String {
        match self {
            Self::Client(c) => format!("client {} ({})", c.cedula, c.name),
            Self::Vehicle(v) => format!("vehicle {} ({} {})", v.plate, v.make, v.model),
            Self::Tariff(t) => format!("tariff {} ({})", t.id, t.vehicle_type),
            Self::Service(s) => format!("service {} ({})", s.id, s.name),
        }
    }
}
