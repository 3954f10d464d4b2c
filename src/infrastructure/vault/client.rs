//! Vault HTTP API client implementation
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, instrument};

use super::retry::RetryPolicy;
use super::types::{VaultResponseV1, VaultResponseV2};
use crate::domain::errors::FetchError;
use crate::domain::models::{FetchTarget, KvVersion, RemoteEnvelope, VaultConfig};
use crate::domain::ports::RemoteFetcher;
use crate::infrastructure::logging::SecretScrubber;

/// Description of the client reading a KV v1 engine
pub const CLIENT_DESCRIPTION_V1: &str = "vault-config-client-v1";

/// Description of the client reading a KV v2 engine
pub const CLIENT_DESCRIPTION_V2: &str = "vault-config-client-v2";

/// Header carrying the client token
const TOKEN_HEADER: &str = "X-Vault-Token";

/// HTTP fetcher for Vault's key/value secret engines
///
/// Features:
/// - Connection pooling and reuse (via reqwest::Client)
/// - KV v1 and v2 path layouts and response envelopes
/// - Exponential backoff retry for transient errors
/// - Token redaction in error bodies
pub struct VaultHttpClient {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// Server endpoint without a trailing slash
    base_url: String,

    /// Client token, if any
    token: Option<String>,

    kv_version: KvVersion,

    /// Retry policy for handling transient errors
    retry_policy: RetryPolicy,

    scrubber: SecretScrubber,
}

impl VaultHttpClient {
    /// Create a client from the Vault section of the configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.uri.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|token| !token.is_empty()),
            kv_version: config.kv_version,
            retry_policy: RetryPolicy::from(&config.retry),
            scrubber: SecretScrubber::new().context("Failed to compile secret scrubber")?,
        })
    }

    /// Full request URL for a target
    pub fn url_for(&self, target: &FetchTarget) -> String {
        format!("{}{}", self.base_url, target.path.request_path(self.kv_version))
    }

    /// Perform a single GET and decode the envelope
    async fn send_request(&self, url: &str) -> Result<RemoteEnvelope, FetchError> {
        let mut request = self.http_client.get(url);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(FetchError::from_status(
                status.as_u16(),
                url,
                self.scrubber.scrub_message(&body),
            ));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        let envelope = match self.kv_version {
            KvVersion::V1 => serde_json::from_slice::<VaultResponseV1>(&bytes)
                .map(VaultResponseV1::into_envelope),
            KvVersion::V2 => serde_json::from_slice::<VaultResponseV2>(&bytes)
                .map(VaultResponseV2::into_envelope),
        }
        .map_err(|err| FetchError::Malformed(err.to_string()))?;

        Ok(envelope)
    }
}

#[async_trait]
impl RemoteFetcher for VaultHttpClient {
    #[instrument(skip(self, target), fields(source = %target.name, kv_version = %self.kv_version))]
    async fn fetch(&self, target: &FetchTarget) -> Result<RemoteEnvelope, FetchError> {
        let url = self.url_for(target);
        debug!(%url, "requesting secret");

        let envelope = self
            .retry_policy
            .execute(|| self.send_request(&url))
            .await?;

        debug!(
            keys = envelope.data.len(),
            request_id = envelope.request_id.as_deref().unwrap_or(""),
            "secret received"
        );
        Ok(envelope)
    }

    fn description(&self) -> &str {
        match self.kv_version {
            KvVersion::V1 => CLIENT_DESCRIPTION_V1,
            KvVersion::V2 => CLIENT_DESCRIPTION_V2,
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Malformed(err.to_string())
    } else {
        FetchError::Network(err.to_string())
    }
}
