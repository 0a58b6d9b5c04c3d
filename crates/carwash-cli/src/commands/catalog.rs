//! `carwash tariffs` and `carwash services`

use carwash_core::prelude::{
    CatalogDraft, SavedRecord, ServiceDraft, ServiceId, TariffDraft, TariffId, views,
};

use super::Context;
use crate::{
    cli::{ConfirmArgs, ServiceCommands, ServiceEdit, TariffCommands, TariffEdit},
    error::{CliError, CliResult},
    render,
};

// ── tariffs ───────────────────────────────────────────────────────────────────

pub async fn tariffs(cmd: TariffCommands, ctx: &Context) -> CliResult<()> {
    match cmd {
        TariffCommands::List => {
            let snapshot = ctx.snapshot().await?;
            let rows = views::tariff_rows(&snapshot);
            if ctx.output.is_json() {
                return ctx.output.json(&rows);
            }
            ctx.output.table(render::tariffs(&rows))?;
            Ok(())
        }
        TariffCommands::Add(fields) => {
            let form = CatalogDraft::Tariff(TariffDraft::new(
                fields.vehicle_type,
                fields.rate,
                fields.fraction,
            ));
            let saved = ctx.repos.records().create_catalog_entry(form).await?;
            ctx.saved("Created", &saved)
        }
        TariffCommands::Edit(edit) => update_tariff(edit, ctx).await,
        TariffCommands::Delete { id, confirm } => delete_tariff(id, confirm, ctx).await,
    }
}

async fn update_tariff(edit: TariffEdit, ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let current = snapshot
        .tariff(edit.id)
        .ok_or_else(|| CliError::UnknownRecord {
            kind: "tariff",
            key: edit.id.to_string(),
        })?;

    let mut draft = TariffDraft::from(current.clone());
    if let Some(vehicle_type) = edit.vehicle_type {
        draft.vehicle_type = vehicle_type;
    }
    if let Some(rate) = edit.rate {
        draft.hourly_rate = rate;
    }
    if let Some(fraction) = edit.fraction {
        draft.fraction = fraction;
    }

    let tariff = ctx.repos.records().update_tariff(edit.id, draft).await?;
    ctx.saved("Updated", &SavedRecord::Tariff(tariff))
}

async fn delete_tariff(id: TariffId, confirm: ConfirmArgs, ctx: &Context) -> CliResult<()> {
    let what = format!("tariff {id}");
    ctx.confirm_delete(&what, confirm)?;
    ctx.repos.records().delete_tariff(id).await?;
    ctx.deleted(&what)
}

// ── services ──────────────────────────────────────────────────────────────────

pub async fn services(cmd: ServiceCommands, ctx: &Context) -> CliResult<()> {
    match cmd {
        ServiceCommands::List => {
            let snapshot = ctx.snapshot().await?;
            let rows = views::service_rows(&snapshot);
            if ctx.output.is_json() {
                return ctx.output.json(&rows);
            }
            ctx.output.table(render::services(&rows))?;
            Ok(())
        }
        ServiceCommands::Add(fields) => {
            let form = CatalogDraft::Service(ServiceDraft::new(
                fields.name,
                fields.description,
                fields.price,
            ));
            let saved = ctx.repos.records().create_catalog_entry(form).await?;
            ctx.saved("Created", &saved)
        }
        ServiceCommands::Edit(edit) => update_service(edit, ctx).await,
        ServiceCommands::Delete { id, confirm } => delete_service(id, confirm, ctx).await,
    }
}

/// Invoices already issued keep the price they were issued with.
async fn update_service(edit: ServiceEdit, ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let current = snapshot
        .services
        .iter()
        .find(|s| s.id == edit.id)
        .ok_or_else(|| CliError::UnknownRecord {
            kind: "service",
            key: edit.id.to_string(),
        })?;

    let mut draft = ServiceDraft::from(current.clone());
    if let Some(name) = edit.name {
        draft.name = name;
    }
    if let Some(description) = edit.description {
        draft.description = description;
    }
    if let Some(price) = edit.price {
        draft.tariff = price;
    }

    let service = ctx.repos.records().update_service(edit.id, draft).await?;
    ctx.saved("Updated", &SavedRecord::Service(service))
}

async fn delete_service(id: ServiceId, confirm: ConfirmArgs, ctx: &Context) -> CliResult<()> {
    let what = format!("service {id}");
    ctx.confirm_delete(&what, confirm)?;
    ctx.repos.records().delete_service(id).await?;
    ctx.deleted(&what)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::testing::offline;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn price_edit_keeps_name() {
        let ctx = offline(OutputFormat::Plain);
        update_service(
            ServiceEdit {
                id: ServiceId::new(3),
                name: None,
                description: None,
                price: Some(Decimal::new(30_000, 0)),
            },
            &ctx,
        )
        .await
        .unwrap();

        let snapshot = ctx.snapshot().await.unwrap();
        let wash = snapshot.services.iter().find(|s| s.id == ServiceId::new(3)).unwrap();
        assert_eq!(wash.tariff, Decimal::new(30_000, 0));
        assert_eq!(wash.name, "Lavado");
    }

    #[tokio::test]
    async fn unknown_tariff_edit_is_not_found() {
        let ctx = offline(OutputFormat::Plain);
        let err = update_tariff(
            TariffEdit {
                id: TariffId::new(404),
                vehicle_type: None,
                rate: Some(Decimal::ONE),
                fraction: None,
            },
            &ctx,
        )
        .await
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn zero_fraction_is_rejected() {
        let ctx = offline(OutputFormat::Plain);
        let err = update_tariff(
            TariffEdit {
                id: TariffId::new(1),
                vehicle_type: None,
                rate: None,
                fraction: Some(Decimal::ZERO),
            },
            &ctx,
        )
        .await
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
