//! View-model queries: pure functions from a [`Snapshot`] to display rows.
//!
//! Rows hold preformatted strings so every front-end renders the same text.
//! Relational joins that fail to resolve degrade to a placeholder instead of
//! an error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::services::{BatchOutcome, BatchState, Snapshot};
use crate::domain::{CarWashInvoice, Cedula, ParkingInvoice, ServiceId, pricing};

/// Shown in place of an owner that no longer resolves.
pub const UNASSIGNED: &str = "unassigned";

pub fn money(amount: Decimal) -> String {
    format!("{amount:.2}")
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn client_label(snapshot: &Snapshot, cedula: Cedula) -> String {
    snapshot
        .client(cedula)
        .map_or_else(|| cedula.to_string(), |c| format!("{} ({})", c.name, c.cedula))
}

// ── Record rows ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRow {
    pub cedula: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub vehicles: usize,
}

pub fn client_rows(snapshot: &Snapshot) -> Vec<ClientRow> {
    snapshot
        .clients
        .iter()
        .map(|c| ClientRow {
            cedula: c.cedula.to_string(),
            name: c.name.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
            vehicles: snapshot
                .vehicles
                .iter()
                .filter(|v| v.owner == c.cedula)
                .count(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRow {
    pub plate: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub owner: String,
}

pub fn vehicle_rows(snapshot: &Snapshot) -> Vec<VehicleRow> {
    snapshot
        .vehicles
        .iter()
        .map(|v| VehicleRow {
            plate: v.plate.to_string(),
            make: v.make.clone(),
            model: v.model.clone(),
            color: v.color.clone(),
            owner: snapshot
                .client(v.owner)
                .map_or_else(|| UNASSIGNED.to_string(), |c| format!("{} ({})", c.name, c.cedula)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TariffRow {
    pub id: String,
    pub vehicle_type: String,
    pub hourly_rate: String,
    pub fraction: String,
}

pub fn tariff_rows(snapshot: &Snapshot) -> Vec<TariffRow> {
    snapshot
        .tariffs
        .iter()
        .map(|t| TariffRow {
            id: t.id.to_string(),
            vehicle_type: t.vehicle_type.clone(),
            hourly_rate: money(t.hourly_rate),
            fraction: format!("{} h", t.fraction.normalize()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tariff: String,
}

pub fn service_rows(snapshot: &Snapshot) -> Vec<ServiceRow> {
    snapshot
        .services
        .iter()
        .map(|s| ServiceRow {
            id: s.id.to_string(),
            name: s.name.clone(),
            description: s.description.clone(),
            tariff: money(s.tariff),
        })
        .collect()
}

// ── Invoice rows ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarWashInvoiceRow {
    pub id: String,
    pub client: String,
    pub plate: String,
    pub services: String,
    pub total: String,
    pub issued_at: String,
}

pub fn car_wash_invoice_rows(snapshot: &Snapshot) -> Vec<CarWashInvoiceRow> {
    snapshot
        .car_wash_invoices
        .iter()
        .map(|i| CarWashInvoiceRow {
            id: i.id.to_string(),
            client: client_label(snapshot, i.client),
            plate: i.plate.to_string(),
            services: i
                .services
                .iter()
                .map(|line| line.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            total: money(i.total),
            issued_at: timestamp(i.issued_at),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParkingInvoiceRow {
    pub id: String,
    pub ticket: String,
    pub tariff: String,
    pub exit_time: String,
    pub total: String,
    pub issued_at: String,
}

pub fn parking_invoice_rows(snapshot: &Snapshot) -> Vec<ParkingInvoiceRow> {
    snapshot
        .parking_invoices
        .iter()
        .map(|i| ParkingInvoiceRow {
            id: i.id.to_string(),
            ticket: i.ticket_id.to_string(),
            tariff: snapshot
                .tariff(i.tariff_id)
                .map_or_else(|| i.tariff_id.to_string(), |t| t.vehicle_type.clone()),
            exit_time: timestamp(i.exit_time),
            total: money(i.total),
            issued_at: timestamp(i.issued_at),
        })
        .collect()
}

// ── Receipt ──────────────────────────────────────────────────────────────────

/// Either kind of invoice, borrowed.
#[derive(Debug, Clone, Copy)]
pub enum InvoiceRef<'a> {
    CarWash(&'a CarWashInvoice),
    Parking(&'a ParkingInvoice),
}

impl<'a> From<&'a CarWashInvoice> for InvoiceRef<'a> {
    fn from(invoice: &'a CarWashInvoice) -> Self {
        Self::CarWash(invoice)
    }
}

impl<'a> From<&'a ParkingInvoice> for InvoiceRef<'a> {
    fn from(invoice: &'a ParkingInvoice) -> Self {
        Self::Parking(invoice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub label: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceReceipt {
    pub title: String,
    pub details: Vec<(String, String)>,
    pub lines: Vec<ReceiptLine>,
    pub total: String,
    /// `None` when the snapshot lacks what is needed to check the total.
    pub reconciled: Option<bool>,
}

pub fn invoice_receipt<'a>(invoice: impl Into<InvoiceRef<'a>>, snapshot: &Snapshot) -> InvoiceReceipt {
    match invoice.into() {
        InvoiceRef::CarWash(invoice) => car_wash_receipt(invoice, snapshot),
        InvoiceRef::Parking(invoice) => parking_receipt(invoice, snapshot),
    }
}

fn car_wash_receipt(invoice: &CarWashInvoice, snapshot: &Snapshot) -> InvoiceReceipt {
    let vehicle = snapshot.vehicle(&invoice.plate).map_or_else(
        || invoice.plate.to_string(),
        |v| format!("{} ({} {}, {})", v.plate, v.make, v.model, v.color),
    );
    InvoiceReceipt {
        title: format!("Car-wash invoice #{}", invoice.id),
        details: vec![
            ("Client".into(), client_label(snapshot, invoice.client)),
            ("Vehicle".into(), vehicle),
            ("Issued".into(), timestamp(invoice.issued_at)),
        ],
        lines: invoice
            .services
            .iter()
            .map(|line| ReceiptLine {
                label: line.name.clone(),
                amount: money(line.tariff),
            })
            .collect(),
        total: money(invoice.total),
        reconciled: Some(invoice.is_reconciled()),
    }
}

fn parking_receipt(invoice: &ParkingInvoice, snapshot: &Snapshot) -> InvoiceReceipt {
    let tariff = snapshot.tariff(invoice.tariff_id);

    let (label, reconciled) = match tariff {
        Some(t) if !t.hourly_rate.is_zero() => {
            let rate = money(t.hourly_rate);
            // Totals and tariffs come from the API; quotients that do not fit
            // leave the receipt unreconciled rather than guessed.
            match invoice.total.checked_div(t.hourly_rate) {
                Some(hours) => (
                    format!("Parking {} h x {rate}", hours.normalize()),
                    pricing::fractions_in(hours, t.fraction)
                        .map(|count| hours >= t.fraction && count.fract().is_zero()),
                ),
                None => (format!("Parking at {rate}/h"), None),
            }
        }
        Some(_) => ("Parking (free tariff)".to_string(), Some(invoice.total.is_zero())),
        None => ("Parking".to_string(), None),
    };

    InvoiceReceipt {
        title: format!("Parking invoice #{}", invoice.id),
        details: vec![
            ("Ticket".into(), invoice.ticket_id.to_string()),
            (
                "Tariff".into(),
                tariff.map_or_else(
                    || invoice.tariff_id.to_string(),
                    |t| format!("{} ({}/h)", t.vehicle_type, money(t.hourly_rate)),
                ),
            ),
            ("Exit".into(), timestamp(invoice.exit_time)),
            ("Issued".into(), timestamp(invoice.issued_at)),
        ],
        lines: vec![ReceiptLine {
            label,
            amount: money(invoice.total),
        }],
        total: money(invoice.total),
        reconciled,
    }
}

// ── Assignment batch ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchView {
    pub summary: String,
    pub created: Vec<String>,
    pub failures: Vec<String>,
}

/// Summarise an assignment batch, naming each failed service and why.
pub fn batch_view(outcome: &BatchOutcome, snapshot: Option<&Snapshot>) -> BatchView {
    let service_name = |id: ServiceId| {
        snapshot
            .and_then(|s| s.services.iter().find(|svc| svc.id == id))
            .map_or_else(|| format!("service {id}"), |svc| format!("{} ({id})", svc.name))
    };

    let summary = match outcome.state {
        BatchState::Completed => format!(
            "{} of {} services assigned to {}",
            outcome.created.len(),
            outcome.attempted(),
            outcome.plate
        ),
        _ => format!(
            "{} of {} services assigned to {}; {} failed",
            outcome.created.len(),
            outcome.attempted(),
            outcome.plate,
            outcome.failed.len()
        ),
    };

    BatchView {
        summary,
        created: outcome
            .created
            .iter()
            .map(|a| format!("{} -> assignment {}", service_name(a.service_id), a.id))
            .collect(),
        failures: outcome
            .failed
            .iter()
            .map(|f| format!("{}: {}", service_name(f.service_id), f.error))
            .collect(),
    }
}
