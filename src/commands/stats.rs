/// `stats`, `db-status` and `instance-status` commands.
use lacus_client::{LacusClient, LacusError};

use crate::cli::OutputCtx;
use crate::cli::args::StatsArgs;
use crate::cli::output::write_document;

/// Run `pylacus stats`.
///
/// # Errors
///
/// Returns `LacusError` on any remote failure.
pub fn run_daily(
    args: &StatsArgs,
    client: &LacusClient,
    ctx: &OutputCtx,
) -> Result<(), LacusError> {
    let _t = ctx.timer("daily_stats");
    let stats = client.daily_stats(args.date, !args.details)?;
    write_document(&stats, ctx);
    Ok(())
}

/// Run `pylacus db-status`.
///
/// # Errors
///
/// Returns `LacusError` on any remote failure.
pub fn run_db_status(client: &LacusClient, ctx: &OutputCtx) -> Result<(), LacusError> {
    let _t = ctx.timer("db_status");
    write_document(&client.db_status()?, ctx);
    Ok(())
}

/// Run `pylacus instance-status`.
///
/// # Errors
///
/// Returns `LacusError` on any remote failure.
pub fn run_instance_status(client: &LacusClient, ctx: &OutputCtx) -> Result<(), LacusError> {
    let _t = ctx.timer("lacus_status");
    write_document(&client.status()?, ctx);
    Ok(())
}
