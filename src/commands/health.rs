/// `--redis_up` flag and `busy` command.
use lacus_client::{LacusClient, LacusError};

use crate::cli::OutputCtx;
use crate::cli::output::write_flag;
use crate::types::FlagOutput;

/// Run `pylacus --redis_up`.
///
/// # Errors
///
/// Cannot currently fail; an unreachable store prints `false`.
pub fn run_redis_up(client: &LacusClient, ctx: &OutputCtx) -> Result<(), LacusError> {
    let _t = ctx.timer("redis_up");
    let up = client.redis_up();
    write_flag(
        &FlagOutput {
            check: "redis_up".to_owned(),
            value: up,
        },
        ctx,
    );
    Ok(())
}

/// Run `pylacus busy`.
///
/// # Errors
///
/// Returns `LacusError` on any remote failure.
pub fn run_busy(client: &LacusClient, ctx: &OutputCtx) -> Result<(), LacusError> {
    let _t = ctx.timer("is_busy");
    let busy = client.is_busy()?;
    write_flag(
        &FlagOutput {
            check: "busy".to_owned(),
            value: busy,
        },
        ctx,
    );
    Ok(())
}
