//! Candidate filtering with composable filters.

pub mod exclusion;

use crate::flightclub::CatalogCandidate;

pub use exclusion::{ExclusionFilter, TagError};

/// Trait for filtering catalog candidates.
pub trait Filter: Send + Sync {
    /// Returns the reason the candidate is dropped, or `None` to keep it.
    fn rejects(&self, candidate: &CatalogCandidate) -> Option<String>;

    /// Returns true if the candidate passes the filter.
    fn matches(&self, candidate: &CatalogCandidate) -> bool {
        self.rejects(candidate).is_none()
    }

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Returns the first rejection reason, stopping at the first filter that rejects.
    pub fn first_rejection(&self, candidate: &CatalogCandidate) -> Option<String> {
        self.filters.iter().find_map(|f| f.rejects(candidate))
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}
