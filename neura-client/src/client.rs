//! HTTP client for the image generation backend.
//!
//! Speaks the backend's single JSON endpoint (`POST <base>/generate`) and
//! classifies every outcome into an image or a [`GenerationFailure`].

use std::sync::Arc;

use async_trait::async_trait;
use neura_core::{GenerateRequest, GenerateResponse, GenerationFailure};
use reqwest::Client;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Anything that can turn a sketch request into a generated image reference.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait GenerationBackend {
    /// Submit the request; `Ok` carries the image URL or data URI.
    ///
    /// # Errors
    ///
    /// Returns the user-facing classification of whatever went wrong.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GenerationFailure>;
}

/// Client for the generation backend.
#[derive(Clone)]
pub struct GenerationClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    timeout: Option<std::time::Duration>,
}

impl GenerationClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the base URL is malformed.
    /// Returns [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let endpoint = config.endpoint()?;
        let http = Self::build_http(config)?;
        tracing::debug!("Generation endpoint: {endpoint}");

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint,
                timeout: config.timeout,
            }),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn build_http(config: &ClientConfig) -> ClientResult<Client> {
        Ok(Client::builder()
            .user_agent(config.user_agent.clone())
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()?)
    }

    #[cfg(target_arch = "wasm32")]
    fn build_http(_config: &ClientConfig) -> ClientResult<Client> {
        Ok(Client::builder().build()?)
    }

    /// The resolved `/generate` URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Send a generation request.
    ///
    /// The body is read as text first so a non-JSON reply (an HTML error page,
    /// an empty body) is judged as a server answer rather than a transport
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if no complete response arrived and
    /// [`ClientError::Rejected`] if the response carried no image.
    pub async fn submit(&self, request: &GenerateRequest) -> ClientResult<String> {
        #[cfg_attr(target_arch = "wasm32", allow(unused_mut))]
        let mut builder = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .json(request);
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: GenerateResponse = serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::warn!("Generation backend returned non-JSON body (HTTP {status}): {e}");
            GenerateResponse::default()
        });

        parsed
            .into_result(status.is_success())
            .map_err(|failure| ClientError::Rejected {
                status: status.as_u16(),
                failure,
            })
    }

    /// Fetch a generated image that was returned as an http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] for a malformed URL,
    /// [`ClientError::Http`] on transport failure and
    /// [`ClientError::Download`] on a non-success status.
    pub async fn download(&self, url: &str) -> ClientResult<Vec<u8>> {
        let url = Url::parse(url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let response = self.inner.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Download(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl GenerationBackend for GenerationClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GenerationFailure> {
        self.submit(request).await.map_err(|e| {
            tracing::warn!("Generation request failed: {e}");
            e.failure()
        })
    }
}
