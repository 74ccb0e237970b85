//! Catalog page extraction.
//!
//! Flight Club catalog pages carry their product list in an inline tracking
//! script, as `'impressions': [ {...}, {...} ]`. The list is decoded as JSON
//! in place; markup around it is ignored.

use super::models::CatalogCandidate;
use super::selectors::catalog;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Matches the impressions key up to and including the list's opening bracket.
static IMPRESSIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]impressions['"]\s*:\s*\["#).unwrap());

/// Decodes the impressions list from the first script that carries one.
///
/// Returns `None` when no script has the marker. The list is read as JSON
/// starting at its opening bracket, so nested arrays inside an entry are
/// fine; whatever follows the closing bracket is ignored.
pub fn find_impressions(html: &str) -> Option<Result<Vec<Value>, serde_json::Error>> {
    let document = Html::parse_document(html);

    document.select(&catalog::SCRIPT).find_map(|script| {
        let text = script.text().collect::<String>();
        let marker = IMPRESSIONS.find(&text)?;
        let list = &text[marker.end() - 1..];

        serde_json::Deserializer::from_str(list).into_iter::<Vec<Value>>().next()
    })
}

/// Extracts catalog candidates in page order.
///
/// Never fails: a missing marker, undecodable payload, or empty list yields a
/// single placeholder candidate so the run still completes.
pub fn extract_candidates(html: &str) -> Vec<CatalogCandidate> {
    let entries = match find_impressions(html) {
        Some(Ok(entries)) => entries,
        Some(Err(e)) => {
            warn!("Failed to decode impressions list: {}", e);
            return vec![CatalogCandidate::placeholder()];
        }
        None => {
            warn!("No impressions list found on catalog page");
            return vec![CatalogCandidate::placeholder()];
        }
    };

    debug!("Found impressions list with {} entries", entries.len());

    let candidates: Vec<CatalogCandidate> =
        entries.iter().filter_map(CatalogCandidate::from_payload).collect();

    if candidates.is_empty() {
        warn!("Impressions list is empty");
        return vec![CatalogCandidate::placeholder()];
    }

    debug!("Extracted {} catalog candidates", candidates.len());
    candidates
}
