//! Run command: catalog to numbered shoe files.

use crate::config::Config;
use crate::descriptor::RunDescriptor;
use crate::emitter::FileEmitter;
use crate::filters::FilterChain;
use crate::flightclub::{build_resolver, catalog, CatalogSource, FlightClubClient, ItemResolver, ResolvedItem};
use anyhow::{Context, Result};
use std::num::NonZeroU32;
use tracing::{debug, info, warn};

/// Hands out consecutive file numbers.
#[derive(Debug, Clone, Copy)]
pub struct SequenceCounter {
    last: u32,
}

impl SequenceCounter {
    /// The first call to [`advance`](Self::advance) returns `start`.
    pub fn new(start: NonZeroU32) -> Self {
        Self { last: start.get() - 1 }
    }

    /// Moves to the next number and returns it.
    ///
    /// Fails once `u32::MAX` has been handed out.
    pub fn advance(&mut self) -> Result<u32> {
        let next = self
            .last
            .checked_add(1)
            .with_context(|| format!("Ran out of file numbers after {}", self.last))?;
        self.last = next;
        Ok(next)
    }

    /// The last number handed out, or `start - 1` if none was.
    pub fn last(&self) -> u32 {
        self.last
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Last sequence number written (start - 1 when nothing was written).
    pub last_number: u32,
    pub written: usize,
    pub excluded: usize,
    /// Files written with at least one sentinel field.
    pub degraded: usize,
}

impl RunSummary {
    /// Start number for a follow-up run continuing this one, or `None` if
    /// the last number was `u32::MAX`.
    pub fn next_start(&self) -> Option<NonZeroU32> {
        NonZeroU32::MIN.checked_add(self.last_number)
    }
}

/// Executes a scrape run for one descriptor.
pub struct RunCommand {
    config: Config,
}

impl RunCommand {
    /// Creates a new run command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs against Flight Club with the configured strategy.
    pub async fn execute(&self, descriptor: &RunDescriptor) -> Result<RunSummary> {
        let client = FlightClubClient::new(&self.config).context("Failed to create HTTP client")?;
        let resolver = build_resolver(&self.config)?;

        self.execute_with(&client, resolver.as_ref(), descriptor).await
    }

    /// Runs with a provided catalog source and resolver (for testing).
    pub async fn execute_with(
        &self,
        source: &impl CatalogSource,
        resolver: &dyn ItemResolver,
        descriptor: &RunDescriptor,
    ) -> Result<RunSummary> {
        // Bad tags fail here, before any request is made
        let mut filters = FilterChain::new();
        filters.add(descriptor.exclusion_filter()?);
        debug!("Active filters: {}", filters.descriptions().join(", "));

        info!("Retrieving site...");
        let html = source
            .catalog(&descriptor.site)
            .await
            .with_context(|| format!("Failed to retrieve catalog for '{}'", descriptor.site))?;

        info!("Starting generation using {} strategy...", resolver.label());
        let candidates = catalog::extract_candidates(&html);
        debug!("Catalog lists {} candidates", candidates.len());

        let emitter = FileEmitter::new(descriptor.output_dir());
        let mut counter = SequenceCounter::new(descriptor.start);
        debug!("Writing shoe files to {}", emitter.dir().display());
        let mut written = 0;
        let mut excluded = 0;
        let mut degraded = 0;

        for candidate in &candidates {
            if filters.first_rejection(candidate).is_some() {
                excluded += 1;
                continue;
            }

            let item = if candidate.is_placeholder() {
                ResolvedItem::not_found()
            } else {
                match resolver.resolve(candidate).await {
                    Ok(item) => item,
                    Err(e) => {
                        warn!("Failed to resolve {}: {:#}", candidate.id, e);
                        ResolvedItem::not_found()
                    }
                }
            };

            if item.is_degraded() {
                degraded += 1;
            }

            emitter.emit(counter.advance()?, &item).await?;
            written += 1;
        }

        let summary = RunSummary { last_number: counter.last(), written, excluded, degraded };
        info!(
            "Finished: {} files written, {} excluded, last file number {}",
            summary.written, summary.excluded, summary.last_number
        );
        Ok(summary)
    }
}
