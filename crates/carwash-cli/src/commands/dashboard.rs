//! `carwash dashboard`: every list from one refresh.

use serde::Serialize;

use carwash_core::prelude::{Snapshot, views};

use super::Context;
use crate::{error::CliResult, render};

#[derive(Debug, Serialize)]
struct Dashboard {
    loaded_at: String,
    clients: Vec<views::ClientRow>,
    vehicles: Vec<views::VehicleRow>,
    tariffs: Vec<views::TariffRow>,
    services: Vec<views::ServiceRow>,
    car_wash_invoices: Vec<views::CarWashInvoiceRow>,
    parking_invoices: Vec<views::ParkingInvoiceRow>,
}

impl From<&Snapshot> for Dashboard {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            loaded_at: snapshot.loaded_at.to_rfc3339(),
            clients: views::client_rows(snapshot),
            vehicles: views::vehicle_rows(snapshot),
            tariffs: views::tariff_rows(snapshot),
            services: views::service_rows(snapshot),
            car_wash_invoices: views::car_wash_invoice_rows(snapshot),
            parking_invoices: views::parking_invoice_rows(snapshot),
        }
    }
}

pub async fn execute(ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let dashboard = Dashboard::from(&snapshot);
    if ctx.output.is_json() {
        return ctx.output.json(&dashboard);
    }

    let out = &ctx.output;
    out.header(&format!("Clients ({})", dashboard.clients.len()))?;
    out.table(render::clients(&dashboard.clients))?;
    out.header(&format!("Vehicles ({})", dashboard.vehicles.len()))?;
    out.table(render::vehicles(&dashboard.vehicles))?;
    out.header("Parking tariffs")?;
    out.table(render::tariffs(&dashboard.tariffs))?;
    out.header("Car-wash services")?;
    out.table(render::services(&dashboard.services))?;
    out.header(&format!("Car-wash invoices ({})", dashboard.car_wash_invoices.len()))?;
    out.table(render::car_wash_invoices(&dashboard.car_wash_invoices))?;
    out.header(&format!("Parking invoices ({})", dashboard.parking_invoices.len()))?;
    out.table(render::parking_invoices(&dashboard.parking_invoices))?;
    Ok(())
}
