/// Output formatting: JSON and table modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};
use lacus_client::CaptureResponseJson;
use serde::Serialize;
use serde_json::Value;

use super::args::OutputFormat;
use crate::types::{CaptureSummaryOutput, EnqueueOutput, FlagOutput, StatusOutput};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
        }
    }

    /// Start a named timer. Logs the elapsed time at debug level on drop.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label)
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        if !self.no_header {
            table.set_header(headers.iter().map(|h| Cell::new(*h)));
        }
        table
    }
}

// --- Enqueue ---

/// Write the identifier of a new capture.
pub fn write_enqueued(out: &EnqueueOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Table | OutputFormat::Auto => println!("{}", out.uuid),
        _ => write_single(out, ctx),
    }
}

// --- Status ---

/// Write a capture status.
pub fn write_status(out: &StatusOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["UUID", "STATUS", "POSITION"]);
            table.add_row([
                out.uuid.as_str(),
                out.status.as_str(),
                &out.position.map(|p| p.to_string()).unwrap_or_default(),
            ]);
            println!("{table}");
        }
        _ => write_single(out, ctx),
    }
}

// --- Result ---

/// Write a raw capture. Tables only show the scalar fields; artifacts need JSON.
pub fn write_capture_raw(uuid: &str, capture: &CaptureResponseJson, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["FIELD", "VALUE"]);
            table.add_row(["uuid", uuid]);
            table.add_row(["status", capture.status.as_str()]);
            for (field, value) in [
                ("last_redirected_url", &capture.last_redirected_url),
                ("error", &capture.error),
                ("downloaded_filename", &capture.downloaded_filename),
            ] {
                if let Some(value) = value {
                    table.add_row([field, value.as_str()]);
                }
            }
            if let Some(runtime) = capture.runtime {
                table.add_row(["runtime", &format!("{runtime:.2}s")]);
            }
            println!("{table}");
        }
        _ => write_single(capture, ctx),
    }
}

/// Write the summary of a decoded capture.
pub fn write_capture_summary(out: &CaptureSummaryOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["FIELD", "VALUE"]);
            table.add_row(["uuid", out.uuid.as_str()]);
            table.add_row(["status", out.status.as_str()]);
            table.add_row(["ready", if out.ready { "yes" } else { "no" }]);
            if let Some(url) = &out.last_redirected_url {
                table.add_row(["last_redirected_url", url.as_str()]);
            }
            if let Some(error) = &out.error {
                table.add_row(["error", error.as_str()]);
            }
            table.add_row(["html", &format!("{} bytes", out.html_bytes)]);
            table.add_row(["png", &format!("{} bytes", out.png_bytes)]);
            if let Some(name) = &out.downloaded_filename {
                table.add_row([
                    "downloaded_file",
                    &format!("{name} ({} bytes)", out.downloaded_bytes),
                ]);
            }
            table.add_row(["cookies", &out.cookies.to_string()]);
            table.add_row(["favicons", &out.favicons.to_string()]);
            table.add_row(["children", &out.children.to_string()]);
            println!("{table}");
        }
        _ => write_single(out, ctx),
    }
}

// --- Health ---

/// Write a boolean check.
pub fn write_flag(out: &FlagOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Table | OutputFormat::Auto => println!("{}: {}", out.check, out.value),
        _ => write_single(out, ctx),
    }
}

// --- Free-form instance documents (stats, db status) ---

/// Write an arbitrary JSON document. Tables list the top-level keys.
pub fn write_document(value: &Value, ctx: &OutputCtx) {
    match (ctx.format, value) {
        (OutputFormat::Table | OutputFormat::Auto, Value::Object(map)) => {
            let mut table = ctx.table(&["KEY", "VALUE"]);
            for (key, v) in map {
                table.add_row([key.as_str(), &scalar(v)]);
            }
            println!("{table}");
        }
        (OutputFormat::Table | OutputFormat::Auto, other) => println!("{}", scalar(other)),
        _ => write_single(value, ctx),
    }
}

/// Write a list of queue entries.
pub fn write_captures(entries: &[Value], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Compact => print_compact_json(entries),
        OutputFormat::Ndjson => print_ndjson(entries),
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["UUID", "DETAILS"]);
            for entry in entries {
                let (uuid, details) = queue_entry_columns(entry);
                table.add_row([uuid, details]);
            }
            println!("{table}");
        }
    }
}

/// Queue entries are either bare identifiers, `[uuid, timestamp]` pairs, or
/// `[uuid, settings]` pairs when settings are requested.
fn queue_entry_columns(entry: &Value) -> (String, String) {
    match entry {
        Value::Array(items) if !items.is_empty() => {
            let uuid = scalar(&items[0]);
            let details = items[1..]
                .iter()
                .map(|v| match v {
                    Value::Object(map) => map
                        .get("url")
                        .or_else(|| map.get("document_name"))
                        .map_or_else(|| scalar(v), scalar),
                    other => scalar(other),
                })
                .collect::<Vec<_>>()
                .join(" ");
            (uuid, details)
        }
        other => (scalar(other), String::new()),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &crate::types::ErrorOutput, format: OutputFormat) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            let s = serde_json::to_string(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Debug timer ---

/// A RAII timer that logs elapsed milliseconds on drop.
///
/// Created via [`OutputCtx::timer`]. Only visible with `--debug` or a
/// `RUST_LOG` that enables debug events.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(label = self.label, elapsed_ms = ms, "timing");
    }
}

// --- Generic JSON helpers ---

fn write_single<T: Serialize>(value: &T, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Compact | OutputFormat::Ndjson => print_compact_json(value),
        _ => print_json(value),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_ndjson<T: Serialize>(values: &[T]) {
    for v in values {
        match serde_json::to_string(v) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("JSON serialization error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_flag_wins() {
        assert_eq!(resolve_format(OutputFormat::Table, true), OutputFormat::Json);
        assert_eq!(resolve_format(OutputFormat::Compact, false), OutputFormat::Compact);
    }

    #[test]
    fn test_queue_entry_columns() {
        assert_eq!(
            queue_entry_columns(&json!(["abc", 1_700_000_000.5])),
            ("abc".to_owned(), "1700000000.5".to_owned())
        );
        assert_eq!(
            queue_entry_columns(&json!(["abc", {"url": "circl.lu", "depth": 0}])),
            ("abc".to_owned(), "circl.lu".to_owned())
        );
        assert_eq!(
            queue_entry_columns(&json!("abc")),
            ("abc".to_owned(), String::new())
        );
    }
}
