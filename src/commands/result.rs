/// `result` command: fetch a capture.
use lacus_client::{LacusClient, LacusError};

use crate::cli::OutputCtx;
use crate::cli::args::ResultArgs;
use crate::cli::output::{write_capture_raw, write_capture_summary};
use crate::types::CaptureSummaryOutput;

/// Run `pylacus result`.
///
/// Prints the capture as sent by the instance unless `--decode` is given, in
/// which case artifacts are decoded and summarised. An unfinished capture is
/// printed like any other; only its status tells it apart.
///
/// # Errors
///
/// Returns `LacusError` on transport failure or an undecodable body.
pub fn run(args: &ResultArgs, client: &LacusClient, ctx: &OutputCtx) -> Result<(), LacusError> {
    let _t = ctx.timer("capture_result");
    if args.decode {
        let capture = client.get_capture(&args.uuid)?;
        write_capture_summary(&CaptureSummaryOutput::new(&args.uuid, &capture), ctx);
    } else {
        let capture = client.get_capture_raw(&args.uuid)?;
        write_capture_raw(&args.uuid, &capture, ctx);
    }
    Ok(())
}
