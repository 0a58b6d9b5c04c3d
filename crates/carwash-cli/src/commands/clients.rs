//! `carwash clients`

use tracing::instrument;

use carwash_core::prelude::{Cedula, ClientDraft, FormDraft, SavedRecord, views};

use super::{Context, find_client};
use crate::{
    cli::{ClientCommands, ClientEdit, ClientFields, ConfirmArgs},
    error::CliResult,
    render,
};

pub async fn execute(cmd: ClientCommands, ctx: &Context) -> CliResult<()> {
    match cmd {
        ClientCommands::List => list(ctx).await,
        ClientCommands::Add(fields) => add(fields, ctx).await,
        ClientCommands::Edit(edit) => update(edit, ctx).await,
        ClientCommands::Delete { cedula, confirm } => delete(cedula, confirm, ctx).await,
    }
}

async fn list(ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let rows = views::client_rows(&snapshot);
    if ctx.output.is_json() {
        return ctx.output.json(&rows);
    }
    if rows.is_empty() {
        ctx.output.info("No clients yet")?;
        return Ok(());
    }
    ctx.output.table(render::clients(&rows))?;
    Ok(())
}

#[instrument(skip_all, fields(cedula = %fields.cedula))]
async fn add(fields: ClientFields, ctx: &Context) -> CliResult<()> {
    let form = FormDraft::Client(ClientDraft::new(
        fields.cedula,
        fields.name,
        fields.phone,
        fields.address,
    ));
    let saved = ctx.repos.records().create_record(form).await?;
    ctx.saved("Created", &saved)
}

/// Unset flags keep the stored value.
#[instrument(skip_all, fields(cedula = %edit.cedula))]
async fn update(edit: ClientEdit, ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let mut draft = ClientDraft::from(find_client(&snapshot, edit.cedula)?.clone());
    if let Some(name) = edit.name {
        draft.name = name;
    }
    if let Some(phone) = edit.phone {
        draft.phone = phone;
    }
    if let Some(address) = edit.address {
        draft.address = address;
    }

    let client = ctx.repos.records().update_client(edit.cedula, draft).await?;
    ctx.saved("Updated", &SavedRecord::Client(client))
}

async fn delete(cedula: Cedula, confirm: ConfirmArgs, ctx: &Context) -> CliResult<()> {
    let what = format!("client {cedula}");
    ctx.confirm_delete(&what, confirm)?;
    ctx.repos.records().delete_client(cedula).await?;
    ctx.deleted(&what)
}
