/// `ongoing` and `enqueued` commands: list captures by queue state.
use lacus_client::{LacusClient, LacusError};

use crate::cli::OutputCtx;
use crate::cli::args::QueueArgs;
use crate::cli::output::write_captures;

/// Run `pylacus ongoing`.
///
/// # Errors
///
/// Returns `LacusError` on any remote failure.
pub fn run_ongoing(
    args: &QueueArgs,
    client: &LacusClient,
    ctx: &OutputCtx,
) -> Result<(), LacusError> {
    let _t = ctx.timer("ongoing_captures");
    let captures = client.ongoing_captures(args.with_settings)?;
    write_captures(&captures, ctx);
    Ok(())
}

/// Run `pylacus enqueued`.
///
/// # Errors
///
/// Returns `LacusError` on any remote failure.
pub fn run_enqueued(
    args: &QueueArgs,
    client: &LacusClient,
    ctx: &OutputCtx,
) -> Result<(), LacusError> {
    let _t = ctx.timer("enqueued_captures");
    let captures = client.enqueued_captures(args.with_settings)?;
    write_captures(&captures, ctx);
    Ok(())
}
