//! Connection management and shared API client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use lattice_core::KnowledgeBaseId;

/// Errors from knowledge-graph API operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a readable response (connect failure,
    /// missing body at stream open).
    #[error("Connection error: {0}")]
    Connection(String),

    /// A read or IO failure mid-flight. Fatal for the whole call; any
    /// partially accumulated data is discarded.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{kind} not found: {id} in knowledge base {kb_id}")]
    NotFound {
        kind: &'static str,
        id: i64,
        kb_id: i64,
    },

    /// A response body failed typed decoding. Only raised by one-shot
    /// endpoints; malformed stream frames are skipped, not raised.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration for connecting to the knowledge-base admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the service, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token attached to every request. Empty means no auth header.
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout for one-shot endpoints. The streaming endpoint
    /// is exempt: a long-lived stream has no natural deadline.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Client for the knowledge-base graph admin API.
///
/// This is the single point of access for all remote graph operations.
/// Clone is cheap (the inner connection pool is an Arc).
#[derive(Clone)]
pub struct GraphApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl GraphApiClient {
    /// Build a client from the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// URL of a graph endpoint under the knowledge base.
    pub(crate) fn graph_url(&self, kb_id: KnowledgeBaseId, suffix: &str) -> String {
        format!(
            "{}/admin/knowledge_bases/{}/graph{}",
            self.config.base_url.trim_end_matches('/'),
            kb_id,
            suffix
        )
    }

    /// A request builder for one-shot endpoints, with auth and timeout set.
    pub(crate) fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .timeout(Duration::from_secs(self.config.timeout_secs));
        self.with_auth(builder)
    }

    /// A request builder for the streaming endpoint: auth, no timeout.
    pub(crate) fn stream_request(&self, url: String) -> reqwest::RequestBuilder {
        self.with_auth(self.http.get(url))
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config.api_key)
        }
    }

    /// Send a one-shot request and decode the JSON response.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
