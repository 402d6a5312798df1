/// `status` command: get the status of a capture.
use lacus_client::{LacusClient, LacusError};

use crate::cli::OutputCtx;
use crate::cli::args::CaptureArgs;
use crate::cli::output::write_status;
use crate::types::StatusOutput;

/// Run `pylacus status`.
///
/// # Errors
///
/// Returns `LacusError::NotFound` if the instance does not know the capture,
/// or `LacusError` on any other failure.
pub fn run(args: &CaptureArgs, client: &LacusClient, ctx: &OutputCtx) -> Result<(), LacusError> {
    let _t = ctx.timer("capture_status");
    let report = client.get_capture_status_report(&args.uuid)?;
    write_status(&StatusOutput::new(&args.uuid, &report), ctx);
    Ok(())
}
