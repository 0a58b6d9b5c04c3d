//! Finalized invoices and the inputs they are built from.
//!
//! Invoices are immutable once the collaborator accepts them. A car-wash
//! invoice carries a snapshot of every service it bills so later catalog edits
//! never change what was charged.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DomainError, DomainValidator as validator,
    entities::CarWashService,
    pricing,
    value_objects::{Cedula, InvoiceId, Plate, ServiceId, TariffId, TicketId},
};

/// A billed line: the service as it was priced when the invoice was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    #[serde(rename = "Servicio_id")]
    pub service_id: ServiceId,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Tarifa")]
    pub tariff: Decimal,
}

impl From<&CarWashService> for ServiceSnapshot {
    fn from(service: &CarWashService) -> Self {
        Self {
            service_id: service.id,
            name: service.name.clone(),
            tariff: service.tariff,
        }
    }
}

// ── Car-wash invoice ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarWashInvoice {
    pub id: InvoiceId,
    #[serde(rename = "Cedula_Cliente")]
    pub client: Cedula,
    #[serde(rename = "Placa_Vehiculo")]
    pub plate: Plate,
    #[serde(rename = "Servicios", default)]
    pub services: Vec<ServiceSnapshot>,
    #[serde(rename = "Total")]
    pub total: Decimal,
    #[serde(rename = "Fecha_Factura")]
    pub issued_at: DateTime<Utc>,
}

impl CarWashInvoice {
    /// Whether the stored total still equals the sum of the embedded lines.
    /// Lines whose sum overflows never reconcile.
    pub fn is_reconciled(&self) -> bool {
        pricing::sum_prices(&self.services) == Some(self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarWashInvoiceDraft {
    #[serde(rename = "Cedula_Cliente")]
    pub client: Cedula,
    #[serde(rename = "Placa_Vehiculo")]
    pub plate: Plate,
    #[serde(rename = "Servicios")]
    pub services: Vec<ServiceSnapshot>,
    #[serde(rename = "Total")]
    pub total: Decimal,
    #[serde(rename = "Fecha_Factura")]
    pub issued_at: DateTime<Utc>,
}

impl CarWashInvoiceDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.services.is_empty() {
            return Err(DomainError::EmptyServiceSet);
        }
        validator::require_non_negative("Total", self.total)
    }
}

// ── Parking ──────────────────────────────────────────────────────────────────

/// A ticket issued when a vehicle enters the lot. Input only; tickets are not
/// stored through the repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingTicket {
    pub id: TicketId,
    pub entry_time: DateTime<Utc>,
    pub plate: Option<Plate>,
}

impl ParkingTicket {
    pub fn new(id: TicketId, entry_time: DateTime<Utc>) -> Self {
        Self {
            id,
            entry_time,
            plate: None,
        }
    }

    pub fn with_plate(mut self, plate: Plate) -> Self {
        self.plate = Some(plate);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingInvoice {
    pub id: InvoiceId,
    #[serde(rename = "Ticket_id")]
    pub ticket_id: TicketId,
    #[serde(rename = "Tarifas_Parking_id")]
    pub tariff_id: TariffId,
    #[serde(rename = "Hora_Salida")]
    pub exit_time: DateTime<Utc>,
    #[serde(rename = "Total")]
    pub total: Decimal,
    #[serde(rename = "Fecha_Factura")]
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingInvoiceDraft {
    #[serde(rename = "Ticket_id")]
    pub ticket_id: TicketId,
    #[serde(rename = "Tarifas_Parking_id")]
    pub tariff_id: TariffId,
    #[serde(rename = "Hora_Salida")]
    pub exit_time: DateTime<Utc>,
    #[serde(rename = "Total")]
    pub total: Decimal,
    #[serde(rename = "Fecha_Factura")]
    pub issued_at: DateTime<Utc>,
}

impl ParkingInvoiceDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        validator::require_non_negative("Total", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(id: u64, tariff: i64) -> ServiceSnapshot {
        ServiceSnapshot {
            service_id: ServiceId::new(id),
            name: format!("svc-{id}"),
            tariff: Decimal::from(tariff),
        }
    }

    fn invoice(total: i64) -> CarWashInvoice {
        CarWashInvoice {
            id: InvoiceId::new(1),
            client: Cedula::new(10).unwrap(),
            plate: Plate::new("AAA111").unwrap(),
            services: vec![line(1, 10), line(2, 15)],
            total: Decimal::from(total),
            issued_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn reconciled_when_total_matches_lines() {
        assert!(invoice(25).is_reconciled());
        assert!(!invoice(30).is_reconciled());
    }

    #[test]
    fn overflowing_lines_never_reconcile() {
        let mut huge = invoice(25);
        huge.services = vec![line(1, 1), line(2, 1)];
        huge.services.iter_mut().for_each(|l| l.tariff = Decimal::MAX);
        huge.total = Decimal::MAX;
        assert!(!huge.is_reconciled());
    }

    #[test]
    fn draft_without_lines_is_rejected() {
        let draft = CarWashInvoiceDraft {
            client: Cedula::new(10).unwrap(),
            plate: Plate::new("AAA111").unwrap(),
            services: vec![],
            total: Decimal::ZERO,
            issued_at: Utc::now(),
        };
        assert_eq!(draft.validate(), Err(DomainError::EmptyServiceSet));
    }

    #[test]
    fn car_wash_invoice_uses_collaborator_names() {
        let json = serde_json::to_value(invoice(25)).unwrap();
        assert_eq!(json["Placa_Vehiculo"], "AAA111");
        assert_eq!(json["Servicios"][1]["Servicio_id"], 2);
        assert_eq!(json["Servicios"][1]["Nombre"], "svc-2");
    }

    #[test]
    fn ticket_plate_is_optional() {
        let entry = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let ticket = ParkingTicket::new(TicketId::new(4), entry);
        assert!(ticket.plate.is_none());
        let ticket = ticket.with_plate(Plate::new("P1").unwrap());
        assert_eq!(ticket.plate.unwrap().as_str(), "P1");
    }
}
