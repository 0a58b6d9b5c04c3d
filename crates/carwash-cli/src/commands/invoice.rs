//! `carwash invoice` and `carwash invoices`.

use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use carwash_core::prelude::{ParkingTicket, views};

use super::{Context, find_vehicle};
use crate::{
    cli::{InvoiceCommands, InvoiceKind, InvoicesCommands, ParkingArgs},
    error::{CliError, CliResult},
    render,
};

pub async fn issue(cmd: InvoiceCommands, ctx: &Context) -> CliResult<()> {
    match cmd {
        InvoiceCommands::CarWash { plate } => {
            let snapshot = ctx.snapshot().await?;
            let vehicle = find_vehicle(&snapshot, &plate)?;
            let invoice = ctx
                .repos
                .generator(&ctx.locks)
                .generate_car_wash_invoice(vehicle)
                .await?;

            show_receipt(views::invoice_receipt(&invoice, &snapshot), ctx)?;
            ctx.output.success(&format!(
                "Invoice #{} issued for {plate}: {}",
                invoice.id,
                views::money(invoice.total)
            ))?;
            Ok(())
        }
        InvoiceCommands::Parking(args) => parking(args, ctx).await,
    }
}

#[instrument(skip_all, fields(ticket = %args.ticket, tariff = %args.tariff))]
async fn parking(args: ParkingArgs, ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let tariff = snapshot
        .tariff(args.tariff)
        .ok_or_else(|| CliError::UnknownRecord {
            kind: "tariff",
            key: args.tariff.to_string(),
        })?;

    let mut ticket = ParkingTicket::new(args.ticket, args.entry);
    if let Some(plate) = args.plate {
        ticket = ticket.with_plate(plate);
    }
    let exit = args.exit.unwrap_or_else(Utc::now);

    let invoice = ctx
        .repos
        .generator(&ctx.locks)
        .generate_parking_invoice(&ticket, tariff, exit)
        .await?;

    let mut receipt = views::invoice_receipt(&invoice, &snapshot);
    if let Some(plate) = &ticket.plate {
        receipt.details.insert(1, ("Plate".into(), plate.to_string()));
    }
    show_receipt(receipt, ctx)?;
    ctx.output.success(&format!(
        "Invoice #{} issued for ticket {}: {}",
        invoice.id,
        invoice.ticket_id,
        views::money(invoice.total)
    ))?;
    Ok(())
}

fn show_receipt(receipt: views::InvoiceReceipt, ctx: &Context) -> CliResult<()> {
    if ctx.output.is_json() {
        return ctx.output.json(&receipt);
    }
    if receipt.reconciled == Some(false) {
        ctx.output
            .warning("The invoice total does not match its lines; report it before handing it over")?;
    }
    ctx.output.table(render::receipt(&receipt))?;
    Ok(())
}

pub async fn list(cmd: InvoicesCommands, ctx: &Context) -> CliResult<()> {
    let InvoicesCommands::List { kind } = cmd;
    let snapshot = ctx.snapshot().await?;
    let car_wash = kind != Some(InvoiceKind::Parking);
    let parking = kind != Some(InvoiceKind::CarWash);

    if ctx.output.is_json() {
        let mut body = serde_json::Map::new();
        if car_wash {
            body.insert("car_wash".into(), json!(views::car_wash_invoice_rows(&snapshot)));
        }
        if parking {
            body.insert("parking".into(), json!(views::parking_invoice_rows(&snapshot)));
        }
        return ctx.output.json(&body);
    }

    if car_wash {
        ctx.output.header("Car-wash invoices")?;
        ctx.output
            .table(render::car_wash_invoices(&views::car_wash_invoice_rows(&snapshot)))?;
    }
    if parking {
        ctx.output.header("Parking invoices")?;
        ctx.output
            .table(render::parking_invoices(&views::parking_invoice_rows(&snapshot)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::testing::offline;
    use carwash_core::prelude::{Plate, TariffId, TicketId};
    use chrono::{DateTime, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    fn stay(ticket: u64, exit: Option<DateTime<Utc>>) -> InvoiceCommands {
        InvoiceCommands::Parking(ParkingArgs {
            ticket: TicketId::new(ticket),
            tariff: TariffId::new(1),
            entry: at(9, 0),
            exit,
            plate: Some(Plate::new("ABC123").unwrap()),
        })
    }

    #[tokio::test]
    async fn car_wash_invoice_bills_pending_services_once() {
        let ctx = offline(OutputFormat::Plain);
        let plate = Plate::new("XYZ987").unwrap();
        issue(InvoiceCommands::CarWash { plate: plate.clone() }, &ctx)
            .await
            .unwrap();

        let snapshot = ctx.snapshot().await.unwrap();
        assert_eq!(snapshot.car_wash_invoices.len(), 1);
        assert_eq!(views::money(snapshot.car_wash_invoices[0].total), "35000.00");

        let again = issue(InvoiceCommands::CarWash { plate }, &ctx)
            .await
            .unwrap_err();
        assert_eq!(again.exit_code(), 2);
    }

    #[tokio::test]
    async fn ticket_is_invoiced_at_most_once() {
        let ctx = offline(OutputFormat::Plain);
        issue(stay(18, Some(at(9, 45))), &ctx).await.unwrap();
        let err = issue(stay(18, Some(at(10, 0))), &ctx).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let snapshot = ctx.snapshot().await.unwrap();
        assert_eq!(snapshot.parking_invoices.len(), 1);
    }

    #[tokio::test]
    async fn exit_before_entry_is_rejected() {
        let ctx = offline(OutputFormat::Plain);
        let err = issue(stay(19, Some(at(8, 0))), &ctx).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn listing_filters_by_kind() {
        let ctx = offline(OutputFormat::Json);
        list(
            InvoicesCommands::List {
                kind: Some(InvoiceKind::Parking),
            },
            &ctx,
        )
        .await
        .unwrap();
    }
}
