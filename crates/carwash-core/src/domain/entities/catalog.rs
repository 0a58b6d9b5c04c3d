//! The price catalog: parking tariffs and car-wash services.
//!
//! Both are keyed by collaborator-assigned ids. Editing a price never touches
//! assignments or invoices that already exist; invoices embed their own
//! snapshot of the services they bill.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DomainError, DomainValidator as validator,
    value_objects::{ServiceId, TariffId},
};

// ── Parking tariff ───────────────────────────────────────────────────────────

/// Hourly parking rate for one vehicle type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingTariff {
    pub id: TariffId,
    #[serde(rename = "Tipo_Vehiculo")]
    pub vehicle_type: String,
    /// Price per hour.
    #[serde(rename = "Hora")]
    pub hourly_rate: Decimal,
    /// Billing granularity in hours; parked time is rounded up to a multiple
    /// of it.
    #[serde(rename = "Fraccion")]
    pub fraction: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffDraft {
    #[serde(rename = "Tipo_Vehiculo")]
    pub vehicle_type: String,
    #[serde(rename = "Hora")]
    pub hourly_rate: Decimal,
    #[serde(rename = "Fraccion")]
    pub fraction: Decimal,
}

impl TariffDraft {
    pub fn new(vehicle_type: impl Into<String>, hourly_rate: Decimal, fraction: Decimal) -> Self {
        Self {
            vehicle_type: vehicle_type.into(),
            hourly_rate,
            fraction,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validator::require_text("Tipo_Vehiculo", &self.vehicle_type)?;
        validator::require_non_negative("Hora", self.hourly_rate)?;
        if self.fraction <= Decimal::ZERO {
            return Err(DomainError::InvalidTariff {
                reason: format!("fraction must be positive, got {}", self.fraction),
            });
        }
        Ok(())
    }
}

impl From<ParkingTariff> for TariffDraft {
    fn from(tariff: ParkingTariff) -> Self {
        Self {
            vehicle_type: tariff.vehicle_type,
            hourly_rate: tariff.hourly_rate,
            fraction: tariff.fraction,
        }
    }
}

// ── Car-wash service ─────────────────────────────────────────────────────────

/// A priced car-wash service that can be assigned to vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarWashService {
    pub id: ServiceId,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Descripcion")]
    pub description: String,
    #[serde(rename = "Tarifa")]
    pub tariff: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDraft {
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Descripcion")]
    pub description: String,
    #[serde(rename = "Tarifa")]
    pub tariff: Decimal,
}

impl ServiceDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>, tariff: Decimal) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tariff,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validator::require_text("Nombre", &self.name)?;
        validator::require_text("Descripcion", &self.description)?;
        validator::require_non_negative("Tarifa", self.tariff)
    }
}

impl From<CarWashService> for ServiceDraft {
    fn from(service: CarWashService) -> Self {
        Self {
            name: service.name,
            description: service.description,
            tariff: service.tariff,
        }
    }
}
