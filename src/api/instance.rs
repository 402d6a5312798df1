/// Instance handle configuration: where the Lacus instance lives and how to reach it.
use std::time::Duration;

use url::Url;

use super::errors::{LacusError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout used by the liveness probe (`is_up`).
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);

/// User agent sent to the instance unless overridden. Not passed on to captures.
#[must_use]
pub fn default_user_agent() -> String {
    format!("lacus-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Connection settings for one Lacus instance.
///
/// Built once, then handed to [`LacusClient::new`](super::LacusClient::new).
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    /// Root URL of the instance as given by the caller.
    pub root_url: String,
    /// Verify the instance's TLS certificate (default: true).
    pub verify_tls: bool,
    /// Bearer token attached to every request.
    pub token: Option<String>,
    /// Proxy used to reach the instance (not the proxy given to captures).
    pub proxy: Option<String>,
    /// User agent of the HTTP client.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl InstanceConfig {
    /// Configuration with defaults for everything but the root URL.
    #[must_use]
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            verify_tls: true,
            token: None,
            proxy: None,
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Normalize a root URL: default the scheme to `http://` and force a trailing `/`
/// so that relative endpoint joins keep any path prefix.
///
/// # Errors
///
/// Returns `LacusError::InvalidInstance` if the result is not a valid http(s) URL.
pub fn normalize_root_url(root_url: &str) -> Result<Url> {
    let trimmed = root_url.trim();
    let invalid = |reason: String| LacusError::InvalidInstance {
        url: root_url.to_owned(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("empty URL".to_owned()));
    }

    let mut candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };
    if !candidate.ends_with('/') {
        candidate.push('/');
    }

    let url = Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_defaulted() {
        let url = normalize_root_url("127.0.0.1:7100").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:7100/");
    }

    #[test]
    fn test_trailing_slash_keeps_prefix() {
        let url = normalize_root_url("https://lacus.example.org/api").unwrap();
        assert_eq!(url.as_str(), "https://lacus.example.org/api/");
        assert_eq!(
            url.join("enqueue").unwrap().as_str(),
            "https://lacus.example.org/api/enqueue"
        );
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            normalize_root_url("   "),
            Err(LacusError::InvalidInstance { .. })
        ));
        assert!(matches!(
            normalize_root_url("ftp://lacus.example.org"),
            Err(LacusError::InvalidInstance { .. })
        ));
        assert!(matches!(
            normalize_root_url("http://[::1"),
            Err(LacusError::InvalidInstance { .. })
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let config = InstanceConfig::new("http://127.0.0.1:7100");
        assert!(config.verify_tls);
        assert!(config.token.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("lacus-client/"));

        let config = config
            .verify_tls(false)
            .token("s3cret")
            .timeout(Duration::from_secs(5));
        assert!(!config.verify_tls);
        assert_eq!(config.token.as_deref(), Some("s3cret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
