/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout, either as JSON or rendered
/// as a table. They are decoupled from the library's capture types.
use lacus_client::{CaptureResponse, CaptureStatusReport, LacusError};
use serde::{Deserialize, Serialize};

/// Result of `enqueue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueOutput {
    /// Identifier of the new capture.
    pub uuid: String,
}

/// Result of `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    pub uuid: String,
    /// Lowercase status name (queued, ongoing, done).
    pub status: String,
    /// Numeric status as sent by the instance.
    pub code: i64,
    /// Position in the queue, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

impl StatusOutput {
    #[must_use]
    pub fn new(uuid: &str, report: &CaptureStatusReport) -> Self {
        Self {
            uuid: uuid.to_owned(),
            status: report.status.as_str().to_owned(),
            code: report.status.code(),
            position: report.position,
        }
    }
}

/// Summary of a decoded capture (`result --decode`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummaryOutput {
    pub uuid: String,
    pub status: String,
    /// Whether the capture is finished.
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_redirected_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub html_bytes: usize,
    pub png_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_filename: Option<String>,
    pub downloaded_bytes: usize,
    pub cookies: usize,
    pub favicons: usize,
    pub children: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<f64>,
}

impl CaptureSummaryOutput {
    #[must_use]
    pub fn new(uuid: &str, capture: &CaptureResponse) -> Self {
        Self {
            uuid: uuid.to_owned(),
            status: capture.status.as_str().to_owned(),
            ready: capture.is_ready(),
            last_redirected_url: capture.last_redirected_url.clone(),
            error: capture.error.clone(),
            html_bytes: capture.html.as_ref().map_or(0, String::len),
            png_bytes: capture.png.as_ref().map_or(0, Vec::len),
            downloaded_filename: capture.downloaded_filename.clone(),
            downloaded_bytes: capture.downloaded_file.as_ref().map_or(0, Vec::len),
            cookies: capture.cookies.as_ref().map_or(0, Vec::len),
            favicons: capture.potential_favicons.as_ref().map_or(0, |f| f.len()),
            children: capture.children.as_ref().map_or(0, Vec::len),
            runtime: capture.runtime,
        }
    }
}

/// A named boolean answer (`--redis_up`, `busy`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagOutput {
    pub check: String,
    pub value: bool,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status returned by the instance, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl ErrorOutput {
    /// Construct from a `LacusError`.
    #[must_use]
    pub fn from_lacus_error(err: &LacusError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
                http_status: err.status(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lacus_client::CaptureStatus;

    #[test]
    fn test_error_envelope() {
        let err = LacusError::Remote {
            status: Some(503),
            message: "redis down".to_owned(),
        };
        let out = ErrorOutput::from_lacus_error(&err);
        assert!(!out.ok);
        assert_eq!(out.error.code, "remote_error");
        assert_eq!(out.error.http_status, Some(503));

        let json = serde_json::to_value(ErrorOutput::from_lacus_error(&LacusError::NotFound {
            uuid: "abc".to_owned(),
        }))
        .unwrap();
        assert_eq!(json["error"]["code"], "not_found");
        assert!(json["error"].get("http_status").is_none());
    }

    #[test]
    fn test_summary_of_placeholder() {
        let capture = CaptureResponse {
            status: CaptureStatus::Queued,
            ..CaptureResponse::default()
        };
        let summary = CaptureSummaryOutput::new("abc-123", &capture);
        assert!(!summary.ready);
        assert_eq!(summary.status, "queued");
        assert_eq!(summary.html_bytes, 0);
    }
}
