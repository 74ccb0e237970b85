//! Turning catalog candidates into name/image pairs.

use super::models::{CatalogCandidate, ResolvedItem};
use super::parser::Parser;
use super::session::{BrowserSession, HttpSessionFactory, SessionFactory};
use crate::config::{Config, Strategy};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Resolves a surviving candidate into its final record.
///
/// Selector misses are not errors: they come back as sentinel fields.
/// Errors are reserved for transport failures.
#[async_trait]
pub trait ItemResolver: Send + Sync {
    async fn resolve(&self, candidate: &CatalogCandidate) -> Result<ResolvedItem>;

    /// Short label for logs.
    fn label(&self) -> &'static str;
}

/// Builds the resolver for the configured strategy.
pub fn build_resolver(config: &Config) -> Result<Box<dyn ItemResolver>> {
    Ok(match config.strategy {
        Strategy::Catalog => Box::new(CatalogResolver),
        Strategy::Search => Box::new(SearchResolver::new(HttpSessionFactory::new(config), config)?),
    })
}

/// Uses the name and image already embedded in the catalog payload.
pub struct CatalogResolver;

#[async_trait]
impl ItemResolver for CatalogResolver {
    async fn resolve(&self, candidate: &CatalogCandidate) -> Result<ResolvedItem> {
        let name = candidate.name.clone().filter(|n| !n.is_empty());
        Ok(ResolvedItem::from_parts(name, candidate.image.clone()))
    }

    fn label(&self) -> &'static str {
        "catalog"
    }
}

/// Searches the site for the candidate id and scrapes the best page found.
///
/// Prefers the item page linked from the search results; when no link ends
/// with the id, the search results page itself is scraped.
pub struct SearchResolver<F: SessionFactory> {
    sessions: F,
    parser: Parser,
    config: Config,
}

impl<F: SessionFactory> SearchResolver<F> {
    /// Creates a resolver, compiling the configured selector chains.
    pub fn new(sessions: F, config: &Config) -> Result<Self> {
        Ok(Self { sessions, parser: Parser::new(config)?, config: config.clone() })
    }

    async fn scrape(&self, session: &mut F::Session, id: &str) -> Result<ResolvedItem> {
        session.visit(&self.config.search_url(id)).await?;

        match self.parser.find_item_link(session.html(), id) {
            Some(link) => {
                debug!("Found item page for {}: {}", id, link);
                session.visit(&link).await?;
            }
            None => debug!("No item page link for {}, using search results", id),
        }

        Ok(self.parser.parse_item(session.html()))
    }
}

#[async_trait]
impl<F: SessionFactory> ItemResolver for SearchResolver<F> {
    async fn resolve(&self, candidate: &CatalogCandidate) -> Result<ResolvedItem> {
        info!("Searching for {}", candidate.id);

        let mut session = self.sessions.open().await?;
        let outcome = self.scrape(&mut session, &candidate.id).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browsing session: {}", e);
        }

        let item = outcome?;
        if item.is_degraded() {
            warn!("Incomplete data for {}: {:?}", candidate.id, item);
        }
        Ok(item)
    }

    fn label(&self) -> &'static str {
        "search"
    }
}
