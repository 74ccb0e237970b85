//! Per-item browsing sessions.
//!
//! Each item lookup opens its own session, drives it through the search and
//! item pages, and closes it before the next item starts. The traits keep
//! the driver swappable: the HTTP-backed session below is the default, and
//! tests use counting fakes.

use super::client::{build_client, fetch};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;
use wreq::Client;

/// A browsing session that holds one current page at a time.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates to `url`, replacing the current page.
    async fn visit(&mut self, url: &str) -> Result<()>;

    /// HTML of the current page, empty before the first visit.
    fn html(&self) -> &str;

    /// Releases the session. Calling it twice is harmless.
    async fn close(&mut self) -> Result<()>;
}

/// Opens browsing sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: BrowserSession;

    /// Opens a new, independent session.
    async fn open(&self) -> Result<Self::Session>;
}

/// Session backed by a dedicated HTTP client with its own cookie jar.
pub struct HttpSession {
    client: Option<Client>,
    html: Option<String>,
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn visit(&mut self, url: &str) -> Result<()> {
        let client = self.client.as_ref().context("Session is closed")?;
        self.html = Some(fetch(client, url).await?);
        Ok(())
    }

    fn html(&self) -> &str {
        self.html.as_deref().unwrap_or_default()
    }

    async fn close(&mut self) -> Result<()> {
        if self.client.take().is_some() {
            debug!("Closed browsing session");
        }
        self.html = None;
        Ok(())
    }
}

/// Opens [`HttpSession`]s with the configured transport settings.
pub struct HttpSessionFactory {
    config: Config,
}

impl HttpSessionFactory {
    /// Creates a factory for the given configuration.
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    type Session = HttpSession;

    async fn open(&self) -> Result<HttpSession> {
        debug!("Opening browsing session");
        Ok(HttpSession { client: Some(build_client(&self.config)?), html: None })
    }
}
