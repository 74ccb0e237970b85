//! HTML parser for Flight Club search results and item pages.

use super::models::ResolvedItem;
use super::selectors::{item, search};
use crate::config::Config;
use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use tracing::{debug, trace};

/// An ordered list of selectors; the first one with a usable match wins.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<(String, Selector)>,
}

impl SelectorChain {
    /// Compiles a chain, rejecting the first selector that does not parse.
    pub fn parse<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let selectors = sources
            .iter()
            .map(|source| {
                let source = source.as_ref();
                Selector::parse(source)
                    .map(|selector| (source.to_string(), selector))
                    .map_err(|e| anyhow!("Invalid CSS selector '{}': {:?}", source, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { selectors })
    }

    /// Returns the number of selectors in the chain.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Returns true if the chain has no selectors.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Text of the first element matched by the earliest selector that has one.
    pub fn first_text(&self, document: &Html) -> Option<String> {
        self.selectors.iter().find_map(|(source, selector)| {
            let text = document
                .select(selector)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty());
            trace!("Selector '{}' -> {:?}", source, text);
            text
        })
    }

    /// First non-empty attribute (in `attrs` order) of the first matched element.
    pub fn first_attr(&self, document: &Html, attrs: &[&str]) -> Option<String> {
        self.selectors.iter().find_map(|(source, selector)| {
            let value = document.select(selector).next().and_then(|e| {
                attrs
                    .iter()
                    .find_map(|attr| e.value().attr(attr))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
            });
            trace!("Selector '{}' -> {:?}", source, value);
            value
        })
    }
}

/// Parser for Flight Club item and search result pages.
pub struct Parser {
    base_url: String,
    names: SelectorChain,
    images: SelectorChain,
}

impl Parser {
    /// Creates a parser with the selector chains from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.site_root().to_string(),
            names: SelectorChain::parse(&config.name_selectors)?,
            images: SelectorChain::parse(&config.image_selectors)?,
        })
    }

    /// Extracts the name and image, substituting sentinels for misses.
    pub fn parse_item(&self, html: &str) -> ResolvedItem {
        let document = Html::parse_document(html);

        let name = self.names.first_text(&document);
        let image = self
            .images
            .first_attr(&document, item::IMAGE_ATTRS)
            .map(|src| self.absolutize(&src));

        debug!("Parsed item name={:?} image={:?}", name, image);
        ResolvedItem::from_parts(name, image)
    }

    /// Finds the item page link for `id` among the page's links.
    pub fn find_item_link(&self, html: &str, id: &str) -> Option<String> {
        if id.is_empty() {
            return None;
        }

        let document = Html::parse_document(html);
        document
            .select(&search::LINK)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href_matches_id(href, id))
            .map(|href| self.absolutize(href))
    }

    /// Resolves a relative href against the site root.
    fn absolutize(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(rest) = href.strip_prefix("//") {
            format!("https://{}", rest)
        } else {
            format!("{}/{}", self.base_url, href.trim_start_matches('/'))
        }
    }
}

/// Returns true if the href's last path segment ends with `-<id>`.
///
/// Query strings, fragments, a trailing slash, and an `.html` suffix are
/// ignored. Ids with spaces match their hyphenated form in the URL.
pub fn href_matches_id(href: &str, id: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".html").unwrap_or(path);
    let segment = path.rsplit('/').next().unwrap_or_default().to_lowercase();

    let id = id.trim().to_lowercase();
    let hyphenated = id.replace(' ', "-");

    [id, hyphenated].iter().any(|needle| segment.ends_with(&format!("-{}", needle)))
}
