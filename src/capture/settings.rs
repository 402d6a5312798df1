/// Capture settings sent to `enqueue`.
///
/// Every parameter the instance recognises is an explicit field. Options left
/// as `None` are omitted from the request body; plain fields are always sent
/// so the instance never has to guess a default.
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{LacusError, Result};

/// Browser engine used for the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chromium,
    Firefox,
    Webkit,
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(Self::Chromium),
            "firefox" => Ok(Self::Firefox),
            "webkit" => Ok(Self::Webkit),
            other => Err(format!(
                "unknown browser '{other}' (expected chromium, firefox or webkit)"
            )),
        }
    }
}

/// Proxy handed to the capture: a URL, or a playwright-style map
/// (`server`, `username`, `password`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProxySetting {
    Url(String),
    Detailed(BTreeMap<String, String>),
}

/// Cookies handed to the capture. The instance accepts a list of cookie
/// objects, a single cookie object, or either of those as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CookieSetting {
    List(Vec<Map<String, Value>>),
    Single(Map<String, Value>),
    Raw(String),
}

/// Extra HTTP headers: a raw `Name: value` block, or a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderSetting {
    Raw(String),
    Map(BTreeMap<String, String>),
}

/// HTTP basic-auth credentials for the captured site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Parameters of a single capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Page to capture. Mutually exclusive with `document`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// File name of the uploaded document, required with `document`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    /// Base64 encoded document to render instead of a URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    /// Recursive capture depth; 0 captures only the given page.
    pub depth: u32,
    /// Only follow links on the rendered hostname. Ignored when `depth` is 0.
    pub rendered_hostname_only: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<Browser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// User agent used by the capture itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxySetting>,
    /// Capture timeout. 0 is a legal (if unwise) value, so only `None` is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_timeout_in_sec: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<CookieSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HeaderSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_credentials: Option<HttpCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<Geolocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    pub java_script_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    pub with_favicon: bool,
    pub allow_tracking: bool,
    /// Browser storage state (cookies, localStorage, indexedDB) to inject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Value>,

    /// Capture again even if an identical capture ran within `recapture_interval`.
    pub force: bool,
    /// Seconds during which an identical request returns the previous capture.
    pub recapture_interval: u64,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    /// Caller-chosen identifier for the capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            url: None,
            document_name: None,
            document: None,
            depth: 0,
            rendered_hostname_only: true,
            browser: None,
            device_name: None,
            user_agent: None,
            proxy: None,
            general_timeout_in_sec: None,
            cookies: None,
            headers: None,
            http_credentials: None,
            geolocation: None,
            timezone_id: None,
            locale: None,
            color_scheme: None,
            java_script_enabled: true,
            viewport: None,
            referer: None,
            with_favicon: false,
            allow_tracking: false,
            storage: None,
            force: false,
            recapture_interval: 300,
            priority: 0,
            max_retries: None,
            uuid: None,
        }
    }
}

impl CaptureSettings {
    /// Settings for capturing a URL, everything else at its default.
    #[must_use]
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Settings for rendering an uploaded document (base64 encoded body).
    #[must_use]
    pub fn for_document(name: impl Into<String>, base64_body: impl Into<String>) -> Self {
        Self {
            document_name: Some(name.into()),
            document: Some(base64_body.into()),
            ..Self::default()
        }
    }

    /// Check that the settings describe exactly one target.
    ///
    /// # Errors
    ///
    /// Returns `LacusError::InvalidRequest` when neither a URL nor a document is
    /// set, when both are, or when a document has no name.
    pub fn validate(&self) -> Result<()> {
        let url = non_empty(self.url.as_deref());
        let document = non_empty(self.document.as_deref());

        match (url, document) {
            (None, None) => Err(LacusError::InvalidRequest(
                "either a url or a document is required".to_owned(),
            )),
            (Some(_), Some(_)) => Err(LacusError::InvalidRequest(
                "url and document are mutually exclusive".to_owned(),
            )),
            (None, Some(_)) if non_empty(self.document_name.as_deref()).is_none() => Err(
                LacusError::InvalidRequest("document_name is required with document".to_owned()),
            ),
            _ => Ok(()),
        }
    }

    /// The settings as they go on the wire: exactly one target.
    ///
    /// A non-blank `url` drops both document fields; a blank one is removed.
    /// Without a url the document is kept only when it has a name.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut body = self.clone();
        if let Some(url) = non_empty(self.url.as_deref()) {
            body.url = Some(url.trim().to_owned());
            body.document = None;
            body.document_name = None;
            return body;
        }

        body.url = None;
        if non_empty(self.document.as_deref()).is_none()
            || non_empty(self.document_name.as_deref()).is_none()
        {
            body.document = None;
            body.document_name = None;
        }
        body
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_only_body_omits_absent_options() {
        let body = serde_json::to_value(CaptureSettings::for_url("circl.lu")).unwrap();
        let obj = body.as_object().unwrap();

        assert_eq!(obj["url"], "circl.lu");
        assert_eq!(obj["depth"], 0);
        assert_eq!(obj["java_script_enabled"], true);
        assert_eq!(obj["rendered_hostname_only"], true);
        assert_eq!(obj["recapture_interval"], 300);
        assert_eq!(obj["priority"], 0);
        for absent in ["document", "document_name", "proxy", "cookies", "uuid", "max_retries"] {
            assert!(!obj.contains_key(absent), "{absent} should be omitted");
        }
    }

    #[test]
    fn test_zero_timeout_is_sent() {
        let settings = CaptureSettings {
            general_timeout_in_sec: Some(0),
            ..CaptureSettings::for_url("circl.lu")
        };
        let body = serde_json::to_value(&settings).unwrap();
        assert_eq!(body["general_timeout_in_sec"], 0);
    }

    #[test]
    fn test_untagged_variants_serialize_as_given() {
        let settings = CaptureSettings {
            proxy: Some(ProxySetting::Url("socks5://127.0.0.1:9050".to_owned())),
            headers: Some(HeaderSetting::Map(BTreeMap::from([(
                "foo".to_owned(),
                "bar".to_owned(),
            )]))),
            cookies: Some(CookieSetting::Raw(r#"{"test": "test"}"#.to_owned())),
            browser: Some(Browser::Webkit),
            viewport: Some(Viewport {
                width: 1280,
                height: 720,
            }),
            ..CaptureSettings::for_url("circl.lu")
        };
        let body = serde_json::to_value(&settings).unwrap();
        assert_eq!(body["proxy"], "socks5://127.0.0.1:9050");
        assert_eq!(body["headers"], json!({"foo": "bar"}));
        assert_eq!(body["cookies"], r#"{"test": "test"}"#);
        assert_eq!(body["browser"], "webkit");
        assert_eq!(body["viewport"], json!({"width": 1280, "height": 720}));
    }

    #[test]
    fn test_cookie_shapes_deserialize() {
        let list: CookieSetting =
            serde_json::from_value(json!([{"name": "a", "value": "b"}])).unwrap();
        assert!(matches!(list, CookieSetting::List(ref c) if c.len() == 1));

        let single: CookieSetting = serde_json::from_value(json!({"name": "a"})).unwrap();
        assert!(matches!(single, CookieSetting::Single(_)));
    }

    #[test]
    fn test_settings_file_fills_defaults() {
        let settings: CaptureSettings =
            serde_json::from_value(json!({"url": "circl.lu", "priority": 5})).unwrap();
        assert_eq!(settings.priority, 5);
        assert!(settings.java_script_enabled);
        assert_eq!(settings.recapture_interval, 300);
    }

    #[test]
    fn test_validate() {
        assert!(CaptureSettings::for_url("circl.lu").validate().is_ok());
        assert!(CaptureSettings::for_document("page.html", "PGh0bWw+").validate().is_ok());

        let missing = CaptureSettings::default().validate();
        assert!(matches!(missing, Err(LacusError::InvalidRequest(_))));

        let blank = CaptureSettings::for_url("   ").validate();
        assert!(matches!(blank, Err(LacusError::InvalidRequest(_))));

        let both = CaptureSettings {
            document: Some("PGh0bWw+".to_owned()),
            ..CaptureSettings::for_url("circl.lu")
        };
        assert!(matches!(both.validate(), Err(LacusError::InvalidRequest(_))));

        let nameless = CaptureSettings {
            document: Some("PGh0bWw+".to_owned()),
            ..CaptureSettings::default()
        };
        assert!(matches!(nameless.validate(), Err(LacusError::InvalidRequest(_))));
    }

    #[test]
    fn test_normalized_url_drops_document_fields() {
        let settings = CaptureSettings {
            document_name: Some("page.html".to_owned()),
            ..CaptureSettings::for_url(" circl.lu ")
        };
        assert!(settings.validate().is_ok());

        let body = serde_json::to_value(settings.normalized()).unwrap();
        let obj = body.as_object().unwrap();
        assert_eq!(obj["url"], "circl.lu");
        assert!(!obj.contains_key("document_name"));
        assert!(!obj.contains_key("document"));
    }

    #[test]
    fn test_normalized_blank_url_is_removed() {
        let settings = CaptureSettings {
            url: Some("  ".to_owned()),
            ..CaptureSettings::for_document("p.html", "PGh0bWw+")
        };
        assert!(settings.validate().is_ok());

        let body = serde_json::to_value(settings.normalized()).unwrap();
        let obj = body.as_object().unwrap();
        assert!(!obj.contains_key("url"));
        assert_eq!(obj["document"], "PGh0bWw+");
        assert_eq!(obj["document_name"], "p.html");
    }

    #[test]
    fn test_normalized_nameless_document_is_dropped() {
        let settings = CaptureSettings {
            document: Some("PGh0bWw+".to_owned()),
            document_name: Some(" ".to_owned()),
            ..CaptureSettings::default()
        };
        let body = settings.normalized();
        assert!(body.document.is_none());
        assert!(body.document_name.is_none());
    }

    #[test]
    fn test_browser_from_str() {
        assert_eq!("Firefox".parse::<Browser>(), Ok(Browser::Firefox));
        assert!("lynx".parse::<Browser>().is_err());
    }
}
