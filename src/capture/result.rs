/// Capture results returned by `capture_result/<uuid>`.
///
/// [`CaptureResponseJson`] mirrors the payload as the instance sends it, with
/// binary artifacts base64 encoded. [`CaptureResponse`] is the same capture
/// with those artifacts decoded to bytes.
use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::status::CaptureStatus;

/// An artifact that is not valid base64.
#[derive(Debug, Error)]
#[error("invalid base64 in '{field}': {source}")]
pub struct ArtifactDecodeError {
    /// Name of the offending field.
    pub field: &'static str,
    #[source]
    pub source: base64::DecodeError,
}

/// A capture as sent over the wire.
///
/// Captures that are not finished come back with only a `status`; every other
/// field is then absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureResponseJson {
    #[serde(default)]
    pub status: CaptureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_redirected_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub har: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<Map<String, Value>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Base64 encoded screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_filename: Option<String>,
    /// Base64 encoded downloaded file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_file: Option<String>,
    /// Sub-captures when `depth` > 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CaptureResponseJson>>,
    /// Capture duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<f64>,
    /// Base64 encoded favicon candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_favicons: Option<Vec<String>>,
    /// Keys this client does not model yet.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A capture with screenshot, downloaded file and favicons decoded to bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureResponse {
    pub status: CaptureStatus,
    pub last_redirected_url: Option<String>,
    pub har: Option<Value>,
    pub cookies: Option<Vec<Map<String, Value>>>,
    pub storage: Option<Value>,
    pub error: Option<String>,
    pub html: Option<String>,
    pub png: Option<Vec<u8>>,
    pub downloaded_filename: Option<String>,
    pub downloaded_file: Option<Vec<u8>>,
    pub children: Option<Vec<CaptureResponse>>,
    pub runtime: Option<f64>,
    pub potential_favicons: Option<BTreeSet<Vec<u8>>>,
    pub extra: Map<String, Value>,
}

impl CaptureResponseJson {
    /// Whether the capture is finished. Unfinished captures are placeholders
    /// carrying only their status.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status.is_done()
    }

    /// Decode base64 artifacts, recursively through children.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactDecodeError` naming the first field that is not valid base64.
    pub fn decode(self) -> Result<CaptureResponse, ArtifactDecodeError> {
        let png = decode_field("png", self.png)?;
        let downloaded_file = decode_field("downloaded_file", self.downloaded_file)?;

        let potential_favicons = match self.potential_favicons {
            Some(favicons) if !favicons.is_empty() => Some(
                favicons
                    .iter()
                    .map(|f| decode_b64("potential_favicons", f))
                    .collect::<Result<BTreeSet<_>, _>>()?,
            ),
            _ => None,
        };

        let children = self
            .children
            .map(|children| {
                children
                    .into_iter()
                    .map(CaptureResponseJson::decode)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(CaptureResponse {
            status: self.status,
            last_redirected_url: self.last_redirected_url,
            har: self.har,
            cookies: self.cookies,
            storage: self.storage,
            error: self.error,
            html: self.html,
            png,
            downloaded_filename: self.downloaded_filename,
            downloaded_file,
            children,
            runtime: self.runtime,
            potential_favicons,
            extra: self.extra,
        })
    }
}

impl CaptureResponse {
    /// Whether the capture is finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status.is_done()
    }
}

fn decode_field(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<Vec<u8>>, ArtifactDecodeError> {
    match value {
        Some(encoded) if !encoded.is_empty() => decode_b64(field, &encoded).map(Some),
        _ => Ok(None),
    }
}

fn decode_b64(field: &'static str, encoded: &str) -> Result<Vec<u8>, ArtifactDecodeError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|source| ArtifactDecodeError { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_is_not_ready() {
        let raw: CaptureResponseJson = serde_json::from_value(json!({"status": 2})).unwrap();
        assert!(!raw.is_ready());
        assert!(raw.html.is_none());

        let decoded = raw.decode().unwrap();
        assert_eq!(decoded.status, CaptureStatus::Ongoing);
        assert!(!decoded.is_ready());
        assert!(decoded.png.is_none());
    }

    #[test]
    fn test_decode_artifacts_and_children() {
        let raw: CaptureResponseJson = serde_json::from_value(json!({
            "status": 1,
            "html": "<html></html>",
            "png": "iVBORw==",
            "downloaded_filename": "a.txt",
            "downloaded_file": "aGVsbG8=",
            "potential_favicons": ["AAE=", "AAE=", "AgM="],
            "runtime": 3.5,
            "children": [{"status": 1, "png": "aGk="}],
            "storage": {"cookies": []}
        }))
        .unwrap();
        assert!(raw.is_ready());

        let decoded = raw.decode().unwrap();
        assert_eq!(decoded.png.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
        assert_eq!(decoded.downloaded_file.as_deref(), Some(&b"hello"[..]));
        assert_eq!(decoded.potential_favicons.as_ref().map(BTreeSet::len), Some(2));
        let children = decoded.children.unwrap();
        assert_eq!(children[0].png.as_deref(), Some(&b"hi"[..]));
        assert_eq!(decoded.storage, Some(json!({"cookies": []})));
    }

    #[test]
    fn test_empty_artifacts_stay_absent() {
        let raw: CaptureResponseJson =
            serde_json::from_value(json!({"status": 1, "png": "", "potential_favicons": []}))
                .unwrap();
        let decoded = raw.decode().unwrap();
        assert!(decoded.png.is_none());
        assert!(decoded.potential_favicons.is_none());
    }

    #[test]
    fn test_bad_base64_names_the_field() {
        let raw: CaptureResponseJson =
            serde_json::from_value(json!({"status": 1, "downloaded_file": "not base64!"}))
                .unwrap();
        let err = raw.decode().unwrap_err();
        assert_eq!(err.field, "downloaded_file");
    }

    #[test]
    fn test_unmodelled_keys_are_kept() {
        let raw: CaptureResponseJson =
            serde_json::from_value(json!({"status": 1, "frames": {"name": "main"}})).unwrap();
        assert_eq!(raw.extra["frames"], json!({"name": "main"}));
        assert_eq!(serde_json::to_value(&raw).unwrap()["frames"], json!({"name": "main"}));
    }
}
