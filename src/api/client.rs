/// Blocking HTTP client for one Lacus instance.
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::errors::{LacusError, Result};
use super::instance::{InstanceConfig, normalize_root_url};
use crate::capture::status::StatusPayload;
use crate::capture::{
    CaptureResponse, CaptureResponseJson, CaptureSettings, CaptureStatus, CaptureStatusReport,
};

/// Handle on a Lacus instance.
///
/// Immutable after construction. Cloning is cheap and shares the underlying
/// connection pool, so one handle can serve several threads; each call is an
/// independent request with no retry.
#[derive(Debug, Clone)]
pub struct LacusClient {
    root_url: Url,
    timeout: Duration,
    http: Client,
}

/// Status code and body of a successful round trip.
pub(crate) struct RawResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl RawResponse {
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| LacusError::malformed(self.status, e))
    }
}

/// The shapes `enqueue` answers with.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnqueuePayload {
    Bare(String),
    Wrapped { uuid: String },
    Failed { error: String },
}

impl LacusClient {
    /// Build a client from an instance configuration.
    ///
    /// # Errors
    ///
    /// Returns `LacusError::InvalidInstance` if the root URL, token or proxy is
    /// unusable, or the TLS backend cannot be initialised.
    pub fn new(config: InstanceConfig) -> Result<Self> {
        let root_url = normalize_root_url(&config.root_url)?;
        let invalid = |reason: String| LacusError::InvalidInstance {
            url: config.root_url.clone(),
            reason,
        };

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| invalid(format!("token is not a valid header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls);
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| invalid(format!("invalid proxy '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build().map_err(|e| invalid(e.to_string()))?;

        debug!(root_url = %root_url, verify_tls = config.verify_tls, "lacus client ready");
        Ok(Self {
            root_url,
            timeout: config.timeout,
            http,
        })
    }

    /// Client for `root_url` with default settings.
    ///
    /// # Errors
    ///
    /// See [`LacusClient::new`].
    pub fn connect(root_url: &str) -> Result<Self> {
        Self::new(InstanceConfig::new(root_url))
    }

    /// Normalized root URL (scheme set, trailing slash).
    #[must_use]
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Submit a capture and return its identifier.
    ///
    /// Settings are validated locally first; an invalid request never reaches the network.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for settings without a target, `Timeout` when the
    /// request exceeds the configured timeout, `Remote` for any other failure.
    pub fn enqueue(&self, settings: &CaptureSettings) -> Result<String> {
        settings.validate()?;

        let url = self.endpoint("enqueue")?;
        let body = settings.normalized();
        let raw = self.round_trip(self.http.post(url.clone()).json(&body), &url)?;
        match raw.json::<EnqueuePayload>()? {
            EnqueuePayload::Bare(uuid) | EnqueuePayload::Wrapped { uuid } if !uuid.is_empty() => {
                debug!(%uuid, "capture enqueued");
                Ok(uuid)
            }
            EnqueuePayload::Failed { error } => Err(LacusError::Remote {
                status: Some(raw.status),
                message: error,
            }),
            _ => Err(LacusError::malformed(raw.status, "empty capture identifier")),
        }
    }

    /// Current status of a capture.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the instance does not know `uuid`, `Timeout` or
    /// `Remote` otherwise.
    pub fn get_capture_status(&self, uuid: &str) -> Result<CaptureStatus> {
        self.get_capture_status_report(uuid).map(|report| report.status)
    }

    /// Status of a capture together with its queue position, if reported.
    ///
    /// # Errors
    ///
    /// Same as [`LacusClient::get_capture_status`].
    pub fn get_capture_status_report(&self, uuid: &str) -> Result<CaptureStatusReport> {
        let raw = self.get_capture_resource("capture_status", uuid)?;
        let report = CaptureStatusReport::from(raw.json::<StatusPayload>()?);
        if report.status == CaptureStatus::Unknown {
            return Err(LacusError::NotFound {
                uuid: uuid.to_owned(),
            });
        }
        Ok(report)
    }

    /// Fetch a capture with its artifacts decoded to bytes.
    ///
    /// An unfinished capture is not an error: the returned value has
    /// `is_ready() == false` and no artifacts.
    ///
    /// # Errors
    ///
    /// Returns `Remote` on transport failure or an undecodable body, `Timeout`
    /// when the request exceeds the configured timeout.
    pub fn get_capture(&self, uuid: &str) -> Result<CaptureResponse> {
        let raw = self.get_capture_resource("capture_result", uuid)?;
        let capture: CaptureResponseJson = raw.json()?;
        capture
            .decode()
            .map_err(|e| LacusError::malformed(raw.status, e))
    }

    /// Fetch a capture exactly as the instance sends it (artifacts base64 encoded).
    ///
    /// # Errors
    ///
    /// Same as [`LacusClient::get_capture`].
    pub fn get_capture_raw(&self, uuid: &str) -> Result<CaptureResponseJson> {
        self.get_capture_resource("capture_result", uuid)?.json()
    }

    fn get_capture_resource(&self, resource: &str, uuid: &str) -> Result<RawResponse> {
        let uuid = uuid.trim();
        let url = self.capture_url(resource, uuid)?;
        self.round_trip(self.http.get(url.clone()), &url)
            .map_err(|e| match e {
                LacusError::Remote {
                    status: Some(404), ..
                } => LacusError::NotFound {
                    uuid: uuid.to_owned(),
                },
                other => other,
            })
    }

    /// `<resource>/<uuid>`, with the identifier percent-encoded as a single segment.
    pub(crate) fn capture_url(&self, resource: &str, uuid: &str) -> Result<Url> {
        if matches!(uuid, "" | "." | "..") {
            return Err(LacusError::InvalidRequest(format!(
                "'{uuid}' is not a capture identifier"
            )));
        }
        let mut url = self.endpoint(resource)?;
        url.path_segments_mut()
            .map_err(|()| {
                LacusError::InvalidRequest(format!("cannot append '{uuid}' to {resource}"))
            })?
            .push(uuid);
        Ok(url)
    }

    /// Resolve a path relative to the root URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.root_url
            .join(path)
            .map_err(|e| LacusError::InvalidRequest(format!("bad endpoint path '{path}': {e}")))
    }

    /// GET `path` and decode the JSON body.
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        self.round_trip(self.http.get(url.clone()).query(query), &url)?
            .json()
    }

    /// Send one request and collect the body. Non-2xx statuses become `Remote`.
    pub(crate) fn round_trip(&self, request: RequestBuilder, url: &Url) -> Result<RawResponse> {
        debug!(%url, "sending request");
        let response = request.send().map_err(|e| self.transport_error(&e, url))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| self.transport_error(&e, url))?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(LacusError::Remote {
                status: Some(status.as_u16()),
                message: error_message(&body),
            });
        }
        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    pub(crate) fn transport_error(&self, err: &reqwest::Error, url: &Url) -> LacusError {
        if err.is_timeout() {
            return LacusError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            };
        }
        LacusError::Remote {
            status: err.status().map(|s| s.as_u16()),
            message: error_chain(err),
        }
    }
}

/// Pull the message out of an `{"error": "..."}` body; fall back to the raw text.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "empty response body".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}

/// Render an error with its sources, `a: b: c`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
