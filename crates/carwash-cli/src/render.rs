//! Table layouts for the view rows.
//!
//! Styling (borders, colour) is applied by [`crate::output::OutputManager`];
//! these functions only decide columns and content.

use carwash_core::application::views::{
    BatchView, CarWashInvoiceRow, ClientRow, InvoiceReceipt, ParkingInvoiceRow, ServiceRow,
    TariffRow, VehicleRow,
};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

fn table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn amount(text: &str) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn clients(rows: &[ClientRow]) -> Table {
    let mut t = table(["Cedula", "Name", "Phone", "Address", "Vehicles"]);
    for r in rows {
        t.add_row(vec![
            Cell::new(&r.cedula),
            Cell::new(&r.name),
            Cell::new(&r.phone),
            Cell::new(&r.address),
            Cell::new(r.vehicles).set_alignment(CellAlignment::Right),
        ]);
    }
    t
}

pub fn vehicles(rows: &[VehicleRow]) -> Table {
    let mut t = table(["Plate", "Make", "Model", "Color", "Owner"]);
    for r in rows {
        t.add_row(vec![
            Cell::new(&r.plate),
            Cell::new(&r.make),
            Cell::new(&r.model),
            Cell::new(&r.color),
            Cell::new(&r.owner),
        ]);
    }
    t
}

pub fn tariffs(rows: &[TariffRow]) -> Table {
    let mut t = table(["Id", "Vehicle type", "Per hour", "Fraction"]);
    for r in rows {
        t.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.vehicle_type),
            amount(&r.hourly_rate),
            amount(&r.fraction),
        ]);
    }
    t
}

pub fn services(rows: &[ServiceRow]) -> Table {
    let mut t = table(["Id", "Name", "Description", "Price"]);
    for r in rows {
        t.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.name),
            Cell::new(&r.description),
            amount(&r.tariff),
        ]);
    }
    t
}

pub fn car_wash_invoices(rows: &[CarWashInvoiceRow]) -> Table {
    let mut t = table(["Invoice", "Client", "Plate", "Services", "Total", "Issued"]);
    for r in rows {
        t.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.client),
            Cell::new(&r.plate),
            Cell::new(&r.services),
            amount(&r.total),
            Cell::new(&r.issued_at),
        ]);
    }
    t
}

pub fn parking_invoices(rows: &[ParkingInvoiceRow]) -> Table {
    let mut t = table(["Invoice", "Ticket", "Tariff", "Exit", "Total", "Issued"]);
    for r in rows {
        t.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.ticket),
            Cell::new(&r.tariff),
            Cell::new(&r.exit_time),
            amount(&r.total),
            Cell::new(&r.issued_at),
        ]);
    }
    t
}

/// Header facts followed by one line per charge and the total.
pub fn receipt(receipt: &InvoiceReceipt) -> Table {
    let mut t = Table::new();
    t.set_header(vec![
        Cell::new(&receipt.title).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for (label, value) in &receipt.details {
        t.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    for line in &receipt.lines {
        t.add_row(vec![Cell::new(&line.label), amount(&line.amount)]);
    }
    t.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        amount(&receipt.total).add_attribute(Attribute::Bold),
    ]);
    if receipt.reconciled == Some(false) {
        t.add_row(vec![
            Cell::new("Check").fg(Color::Red),
            Cell::new("total does not match its lines").fg(Color::Red),
        ]);
    }
    t
}

pub fn batch(view: &BatchView) -> Table {
    let mut t = table(["Result", "Detail"]);
    for line in &view.created {
        t.add_row(vec![Cell::new("assigned").fg(Color::Green), Cell::new(line)]);
    }
    for line in &view.failures {
        t.add_row(vec![Cell::new("failed").fg(Color::Red), Cell::new(line)]);
    }
    t
}
