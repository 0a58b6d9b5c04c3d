//! `carwash assign`: put car-wash services on a vehicle's pending list.

use tracing::instrument;

use carwash_core::prelude::views;

use super::{Context, find_vehicle};
use crate::{
    cli::AssignArgs,
    error::{CliError, CliResult},
    render,
};

/// Run one assignment batch.
///
/// Services that were created stay created. When any item fails the batch
/// view is still printed, then [`CliError::PartialBatch`] carries the retry
/// selection.
#[instrument(skip_all, fields(plate = %args.plate))]
pub async fn execute(args: AssignArgs, ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.snapshot().await?;
    let vehicle = find_vehicle(&snapshot, &args.plate)?;

    let outcome = ctx
        .repos
        .coordinator(&ctx.locks)
        .assign(vehicle, &args.services)
        .await?;
    let view = views::batch_view(&outcome, Some(&snapshot));

    if ctx.output.is_json() {
        ctx.output.json(&view)?;
    } else {
        ctx.output.table(render::batch(&view))?;
    }

    if outcome.is_complete() {
        ctx.output.success(&view.summary)?;
        return Ok(());
    }

    ctx.output.warning(&view.summary)?;
    Err(CliError::PartialBatch {
        plate: outcome.plate.to_string(),
        failed: outcome.failed.len(),
        attempted: outcome.attempted(),
        retry: outcome
            .retry_selection()
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::testing::offline;
    use carwash_core::prelude::{Plate, ServiceId};

    fn args(plate: &str, services: &[u64]) -> AssignArgs {
        AssignArgs {
            plate: Plate::new(plate).unwrap(),
            services: services.iter().copied().map(ServiceId::new).collect(),
        }
    }

    #[tokio::test]
    async fn full_batch_succeeds() {
        let ctx = offline(OutputFormat::Plain);
        execute(args("ABC123", &[3, 4]), &ctx).await.unwrap();
    }

    #[tokio::test]
    async fn failed_items_are_offered_for_retry() {
        let ctx = offline(OutputFormat::Plain);
        let err = execute(args("ABC123", &[3, 99]), &ctx).await.unwrap_err();
        match err {
            CliError::PartialBatch {
                failed,
                attempted,
                retry,
                ..
            } => {
                assert_eq!((failed, attempted), (1, 2));
                assert_eq!(retry, vec!["99".to_string()]);
            }
            other => panic!("expected a partial batch, got {other:?}"),
        }

        // The retry only resubmits the failure, so service 3 is not duplicated.
        let retry = execute(args("ABC123", &[99]), &ctx).await.unwrap_err();
        assert!(matches!(retry, CliError::PartialBatch { attempted: 1, .. }));
    }

    #[tokio::test]
    async fn duplicate_selection_writes_nothing() {
        let ctx = offline(OutputFormat::Plain);
        let err = execute(args("ABC123", &[3, 3]), &ctx).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        // Nothing was created, so a clean batch for 3 still succeeds.
        execute(args("ABC123", &[3]), &ctx).await.unwrap();
    }
}
