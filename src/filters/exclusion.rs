//! Exclude-tag filtering on candidate names.
//!
//! Tags are case-insensitive regular expressions searched anywhere in the
//! name, so `retro` drops "Air Jordan 1 Retro High" and `^nike` only drops
//! names that start with "Nike". Look-around and backreferences work, so
//! `^(?!.*low)` drops every name without "low" in it. A tag meant literally
//! must escape metacharacters (`\(`, `\.`, ...).

use super::Filter;
use crate::flightclub::CatalogCandidate;
use fancy_regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

/// An exclude tag that does not compile as a regular expression.
#[derive(Debug, Error)]
#[error("Invalid exclude tag '{tag}': {source}")]
pub struct TagError {
    pub tag: String,
    #[source]
    pub source: fancy_regex::Error,
}

/// Drops candidates whose name matches any exclude tag.
pub struct ExclusionFilter {
    tags: Vec<(String, Regex)>,
}

impl ExclusionFilter {
    /// Compiles the tags in order; the first invalid tag is an error.
    pub fn new<S: AsRef<str>>(tags: &[S]) -> Result<Self, TagError> {
        let tags = tags
            .iter()
            .map(|tag| {
                let tag = tag.as_ref();
                Regex::new(&format!("(?i){}", tag))
                    .map(|re| (tag.to_string(), re))
                    .map_err(|source| TagError { tag: tag.to_string(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tags })
    }

    /// Returns the first tag, in list order, that matches `name`.
    ///
    /// A tag that hits the backtracking limit on `name` counts as no match.
    pub fn matching_tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(tag, re)| match re.is_match(name) {
                Ok(matched) => matched,
                Err(e) => {
                    warn!("Exclude tag '{}' gave up on '{}': {}", tag, name, e);
                    false
                }
            })
            .map(|(tag, _)| tag.as_str())
    }

    /// Returns true if any tag matches `name`.
    pub fn should_exclude(&self, name: &str) -> bool {
        self.matching_tag(name).is_some()
    }

    /// Returns true if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Filter for ExclusionFilter {
    fn rejects(&self, candidate: &CatalogCandidate) -> Option<String> {
        // A candidate without a name has nothing to match against
        let name = candidate.name.as_deref()?;
        let tag = self.matching_tag(name)?;
        info!("Excluding '{}', found with tag {}", name, tag);
        Some(tag.to_string())
    }

    fn description(&self) -> String {
        if self.is_empty() {
            "Exclude tags: none".to_string()
        } else {
            let tags: Vec<&str> = self.tags.iter().map(|(tag, _)| tag.as_str()).collect();
            format!("Exclude tags: {}", tags.join(", "))
        }
    }
}
