//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Backend address used when nothing is configured (local development).
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "NEURA_API_URL";

/// Path of the generation endpoint, relative to the base URL.
pub const GENERATE_PATH: &str = "generate";

/// Configuration for [`crate::GenerationClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Request timeout. `None` lets a request run until it completes or fails.
    pub timeout: Option<Duration>,
    /// `User-Agent` header sent with requests (ignored in browsers).
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    /// Configuration pointing at `base_url`, without a timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: concat!("neura-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read the base URL from [`API_URL_ENV`], falling back to [`DEFAULT_API_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(API_URL_ENV).ok().as_deref())
    }

    /// Build from an optional configured value; blank counts as unset.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Set a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The full URL of the generation endpoint.
    ///
    /// A path on the base URL is kept as a prefix: `http://host/api` becomes
    /// `http://host/api/generate`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] unless the base is an http(s) URL.
    pub fn endpoint(&self) -> ClientResult<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{GENERATE_PATH}"));
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.timeout.is_none());
        assert_eq!(
            config.endpoint().expect("endpoint").as_str(),
            "http://localhost:5000/generate"
        );
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        assert_eq!(ClientConfig::from_value(None).base_url, DEFAULT_API_URL);
        assert_eq!(ClientConfig::from_value(Some("  ")).base_url, DEFAULT_API_URL);
        assert_eq!(
            ClientConfig::from_value(Some("https://paint.example.com")).base_url,
            "https://paint.example.com"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let config = ClientConfig::new("https://example.com/api/");
        assert_eq!(
            config.endpoint().expect("endpoint").as_str(),
            "https://example.com/api/generate"
        );
    }

    #[test]
    fn endpoint_rejects_non_http() {
        for bad in ["not a url", "ftp://example.com", "localhost:5000"] {
            let err = ClientConfig::new(bad).endpoint().expect_err(bad);
            assert!(matches!(err, ClientError::InvalidUrl(_)), "{bad}: {err:?}");
        }
    }

    #[test]
    fn with_timeout_sets_duration() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(30));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
