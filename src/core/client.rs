//! Shared HTTP plumbing for backend calls
//!
//! One pooled client serves the whole process. Timeouts are set per request
//! from `BackendConfig` so the heatmap call can run on a longer budget than the rest.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::core::config::BackendConfig;
use crate::core::error::Cause;

/// Global HTTP client with connection pooling
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(8)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("saferoute/{}", env!("SAFEROUTE_VERSION")))
        .build()
        .unwrap_or_else(|err| {
            log::warn!("Falling back to default HTTP client: {err}");
            Client::new()
        })
});

/// Handle to the routing backend: the shared client plus read-only configuration.
///
/// Cheap to clone; every resolver and fetcher keeps its own copy.
#[derive(Debug, Clone)]
pub struct Backend {
    client: Client,
    config: Arc<BackendConfig>,
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: GLOBAL_CLIENT.clone(),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Send with the default per-call timeout and decode a JSON body
    pub async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Cause> {
        send_json(request, self.config.request_timeout).await
    }

    /// Send with the extended heatmap timeout and decode a JSON body
    pub async fn json_extended<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Cause> {
        send_json(request, self.config.heatmap_timeout).await
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder, timeout: Duration) -> Result<T, Cause> {
    let response = request.timeout(timeout).send().await?;

    let status = response.status();
    if !status.is_success() {
        let url = response.url().clone();
        return Err(Cause::Http(format!("{status} from {url}")));
    }

    // Decode from text so a malformed body reports what it actually was
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| {
        log::debug!("Undecodable response body: {body}");
        Cause::from(err)
    })
}
