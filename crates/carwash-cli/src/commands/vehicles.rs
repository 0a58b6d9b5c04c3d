//! `carwash vehicles`

use tracing::instrument;

use carwash_core::prelude::{FormDraft, Plate, SavedRecord, VehicleDraft, views};

use super::{Context, find_vehicle};
use crate::{
    cli::{ConfirmArgs, VehicleCommands, VehicleEdit, VehicleFields},
    error::CliResult,
    render,
};

pub async fn execute(cmd: VehicleCommands, ctx: &Context) -> CliResult<()> {
    match cmd {
        VehicleCommands::List => list(ctx).await,
        VehicleCommands::Add(fields) => add(fields, ctx).await,
        VehicleCommands::Edit(edit) => update(edit, ctx).await,
        VehicleCommands::Delete { plate, confirm } => delete(plate, confirm, ctx).await,
    }
}

async fn list(ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let rows = views::vehicle_rows(&snapshot);
    if ctx.output.is_json() {
        return ctx.output.json(&rows);
    }
    if rows.is_empty() {
        ctx.output.info("No vehicles yet")?;
        return Ok(());
    }
    ctx.output.table(render::vehicles(&rows))?;
    Ok(())
}

#[instrument(skip_all, fields(plate = %fields.plate))]
async fn add(fields: VehicleFields, ctx: &Context) -> CliResult<()> {
    let form = FormDraft::Vehicle(VehicleDraft::new(
        fields.plate,
        fields.make,
        fields.model,
        fields.color,
        fields.owner,
    ));
    let saved = ctx.repos.records().create_record(form).await?;
    ctx.saved("Created", &saved)
}

#[instrument(skip_all, fields(plate = %edit.plate))]
async fn update(edit: VehicleEdit, ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let mut draft = VehicleDraft::from(find_vehicle(&snapshot, &edit.plate)?.clone());
    if let Some(make) = edit.make {
        draft.make = make;
    }
    if let Some(model) = edit.model {
        draft.model = model;
    }
    if let Some(color) = edit.color {
        draft.color = color;
    }
    if let Some(owner) = edit.owner {
        draft.owner = owner;
    }

    let vehicle = ctx.repos.records().update_vehicle(&edit.plate, draft).await?;
    ctx.saved("Updated", &SavedRecord::Vehicle(vehicle))
}

async fn delete(plate: Plate, confirm: ConfirmArgs, ctx: &Context) -> CliResult<()> {
    let what = format!("vehicle {plate}");
    ctx.confirm_delete(&what, confirm)?;
    ctx.repos.records().delete_vehicle(&plate).await?;
    ctx.deleted(&what)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::testing::offline;
    use carwash_core::prelude::Cedula;

    #[tokio::test]
    async fn owner_can_be_reassigned() {
        let ctx = offline(OutputFormat::Plain);
        let plate = Plate::new("MOT45E").unwrap();
        update(
            VehicleEdit {
                plate: plate.clone(),
                make: None,
                model: None,
                color: Some("Negro".into()),
                owner: Some(Cedula::new(1_010_101).unwrap()),
            },
            &ctx,
        )
        .await
        .unwrap();

        let snapshot = ctx.snapshot().await.unwrap();
        let vehicle = snapshot.vehicle(&plate).unwrap();
        assert_eq!(vehicle.owner, Cedula::new(1_010_101).unwrap());
        assert_eq!(vehicle.color, "Negro");
    }

    #[tokio::test]
    async fn deleted_vehicle_leaves_the_list() {
        let ctx = offline(OutputFormat::Plain);
        let plate = Plate::new("ABC123").unwrap();
        delete(plate.clone(), ConfirmArgs { yes: true }, &ctx)
            .await
            .unwrap();
        let snapshot = ctx.snapshot().await.unwrap();
        assert!(snapshot.vehicle(&plate).is_none());
    }
}
