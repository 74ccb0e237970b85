//! HTTP client for Flight Club requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Trait for catalog page fetching - enables mocking for tests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches the catalog page for a descriptor `site` value.
    async fn catalog(&self, site: &str) -> Result<String>;
}

/// Builds a wreq client with the configured timeouts and proxy.
///
/// Every call yields a fresh cookie store, so each client is its own
/// browsing session.
pub fn build_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder()
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

    if let Some(proxy_url) = &config.proxy {
        debug!("Configuring proxy: {}", proxy_url);
        let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
        builder = builder.proxy(proxy);
    }

    builder.build().context("Failed to create HTTP client")
}

/// Performs a GET request with browser emulation and returns the body.
///
/// Non-2xx responses are errors; nothing is retried.
pub async fn fetch(client: &Client, url: &str) -> Result<String> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .emulation(Emulation::Chrome131)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .header("Accept-Encoding", "gzip, deflate, br")
        .header("Cache-Control", "no-cache")
        .header("Sec-Fetch-Dest", "document")
        .header("Sec-Fetch-Mode", "navigate")
        .header("Sec-Fetch-Site", "none")
        .header("Upgrade-Insecure-Requests", "1")
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", url))?;

    let status = response.status();
    debug!("Response status: {}", status);

    if status == 403 || status == 429 {
        warn!("Blocked by the site ({}). Consider using a proxy.", status);
    }

    if !status.is_success() {
        anyhow::bail!("Request to {} failed with status: {}", url, status);
    }

    response.text().await.context("Failed to read response body")
}

/// Flight Club HTTP client with browser impersonation.
pub struct FlightClubClient {
    client: Client,
    config: Config,
}

impl FlightClubClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self { client: build_client(config)?, config: config.clone() })
    }
}

#[async_trait]
impl CatalogSource for FlightClubClient {
    async fn catalog(&self, site: &str) -> Result<String> {
        let url = self.config.catalog_url(site);

        info!("Retrieving catalog: {}", url);
        fetch(&self.client, &url).await
    }
}
