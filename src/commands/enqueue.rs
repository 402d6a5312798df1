/// `enqueue` command: submit a capture and print its identifier.
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lacus_client::capture::ProxySetting;
use lacus_client::{CaptureSettings, LacusClient, LacusError};

use crate::cli::OutputCtx;
use crate::cli::args::EnqueueArgs;
use crate::cli::output::write_enqueued;
use crate::types::EnqueueOutput;

/// Run `pylacus enqueue`.
///
/// # Errors
///
/// Returns `LacusError::InvalidRequest` for unreadable files or settings without
/// a target, and `LacusError` on any remote failure.
pub fn run(args: &EnqueueArgs, client: &LacusClient, ctx: &OutputCtx) -> Result<(), LacusError> {
    let settings = build_settings(args)?;

    let _t = ctx.timer("enqueue");
    let uuid = client.enqueue(&settings)?;
    write_enqueued(&EnqueueOutput { uuid }, ctx);
    Ok(())
}

/// Merge the optional settings file with command-line overrides.
///
/// # Errors
///
/// Returns `LacusError::InvalidRequest` if a referenced file cannot be read or parsed.
pub fn build_settings(args: &EnqueueArgs) -> Result<CaptureSettings, LacusError> {
    let mut settings = match &args.settings {
        Some(path) => {
            let text = read_file(path).and_then(|bytes| {
                String::from_utf8(bytes).map_err(|e| {
                    LacusError::InvalidRequest(format!("{} is not UTF-8: {e}", path.display()))
                })
            })?;
            serde_json::from_str(&text).map_err(|e| {
                LacusError::InvalidRequest(format!(
                    "invalid capture settings in {}: {e}",
                    path.display()
                ))
            })?
        }
        None => CaptureSettings::default(),
    };

    if let Some(url) = &args.url {
        settings.url = Some(url.clone());
        settings.document = None;
        settings.document_name = None;
    }
    if let Some(path) = &args.document {
        let body = read_file(path)?;
        let name = path
            .file_name()
            .map_or_else(|| "document".to_owned(), |n| n.to_string_lossy().into_owned());
        settings.url = None;
        settings.document_name = Some(name);
        settings.document = Some(STANDARD.encode(body));
    }

    if let Some(depth) = args.depth {
        settings.depth = depth;
    }
    if let Some(priority) = args.priority {
        settings.priority = priority;
    }
    if args.max_retries.is_some() {
        settings.max_retries = args.max_retries;
    }
    if args.force {
        settings.force = true;
    }
    if args.browser.is_some() {
        settings.browser = args.browser;
    }
    if let Some(device) = &args.device_name {
        settings.device_name = Some(device.clone());
    }
    if let Some(ua) = &args.capture_user_agent {
        settings.user_agent = Some(ua.clone());
    }
    if let Some(proxy) = &args.capture_proxy {
        settings.proxy = Some(ProxySetting::Url(proxy.clone()));
    }
    if args.capture_timeout.is_some() {
        settings.general_timeout_in_sec = args.capture_timeout;
    }

    Ok(settings)
}

fn read_file(path: &Path) -> Result<Vec<u8>, LacusError> {
    std::fs::read(path)
        .map_err(|e| LacusError::InvalidRequest(format!("cannot read {}: {e}", path.display())))
}
