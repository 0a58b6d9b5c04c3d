use serde::{Deserialize, Serialize};

use crate::domain::{
    DomainError, DomainValidator as validator,
    value_objects::{Cedula, Plate},
};

/// A vehicle, keyed by plate and owned by exactly one client.
///
/// `owner` is a relational reference resolved by lookup; nothing guarantees it
/// still resolves when the vehicle is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "Placa")]
    pub plate: Plate,
    #[serde(rename = "Marca")]
    pub make: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Cedula_Cliente")]
    pub owner: Cedula,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDraft {
    #[serde(rename = "Placa")]
    pub plate: Plate,
    #[serde(rename = "Marca")]
    pub make: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Cedula_Cliente")]
    pub owner: Cedula,
}

impl VehicleDraft {
    pub fn new(
        plate: Plate,
        make: impl Into<String>,
        model: impl Into<String>,
        color: impl Into<String>,
        owner: Cedula,
    ) -> Self {
        Self {
            plate,
            make: make.into(),
            model: model.into(),
            color: color.into(),
            owner,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validator::require_text("Marca", &self.make)?;
        validator::require_text("Modelo", &self.model)?;
        validator::require_text("Color", &self.color)
    }
}

impl From<Vehicle> for VehicleDraft {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            plate: vehicle.plate,
            make: vehicle.make,
            model: vehicle.model,
            color: vehicle.color,
            owner: vehicle.owner,
        }
    }
}
