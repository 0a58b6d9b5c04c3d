use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AssignmentId, Plate, ServiceId};

/// One car-wash service performed on one vehicle.
///
/// `billed` only ever moves from `false` to `true`, when the assignment is
/// consumed by a car-wash invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAssignment {
    pub id: AssignmentId,
    #[serde(rename = "Placa_Vehiculo")]
    pub plate: Plate,
    #[serde(rename = "Servicio_id")]
    pub service_id: ServiceId,
    #[serde(rename = "Fecha_Servicio")]
    pub performed_at: DateTime<Utc>,
    #[serde(rename = "Facturado", default)]
    pub billed: bool,
}

impl ServiceAssignment {
    pub fn is_billable(&self) -> bool {
        !self.billed
    }
}

/// Creation payload. The plate travels in the route, not the body, and new
/// assignments are always unbilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    #[serde(rename = "Servicio_id")]
    pub service_id: ServiceId,
    #[serde(rename = "Fecha_Servicio")]
    pub performed_at: DateTime<Utc>,
}

impl AssignmentDraft {
    pub fn new(service_id: ServiceId, performed_at: DateTime<Utc>) -> Self {
        Self {
            service_id,
            performed_at,
        }
    }
}
