//! Data models for catalog candidates and resolved shoe records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Written in place of a shoe name that could not be found.
pub const NULL_NAME: &str = "NoNameFound";

/// Written in place of an image URL that could not be found.
pub const NULL_IMAGE: &str = "NoImageURLFound";

/// Name carried by the placeholder candidate when a catalog page has no usable list.
pub const PLACEHOLDER_NAME: &str = "NULL";

/// A catalog entry before exclusion filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCandidate {
    /// Site item identifier (style code / SKU as the tracking payload reports it)
    pub id: String,
    /// Display name from the tracking payload, if any
    pub name: Option<String>,
    /// Inline image URL, present on some catalog payloads
    pub image: Option<String>,
}

impl CatalogCandidate {
    /// Creates a candidate with an id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: Some(name.into()), image: None }
    }

    /// The stand-in entry produced when the catalog list is missing or unusable.
    pub fn placeholder() -> Self {
        Self { id: String::new(), name: Some(PLACEHOLDER_NAME.to_string()), image: None }
    }

    /// Returns true for the stand-in entry (no id to resolve).
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }

    /// Builds a candidate from one object of the tracking payload.
    ///
    /// Ids are accepted as strings or numbers. Returns `None` when the entry
    /// is not an object.
    pub fn from_payload(entry: &Value) -> Option<Self> {
        let object = entry.as_object()?;

        let id = match object.get("id") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let name = object.get("name").and_then(Value::as_str).map(|s| s.trim().to_string());

        let image = ["image", "img", "image_url"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(String::from);

        Some(Self { id, name, image })
    }
}

/// Final shoe name and image URL pair written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    /// Shoe display name
    #[serde(rename = "name")]
    pub display_name: String,
    /// Shoe image URL
    #[serde(rename = "img")]
    pub image_url: String,
}

impl ResolvedItem {
    /// Creates a resolved pair.
    pub fn new(display_name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self { display_name: display_name.into(), image_url: image_url.into() }
    }

    /// Builds a pair from optional lookups, substituting sentinels for misses.
    pub fn from_parts(display_name: Option<String>, image_url: Option<String>) -> Self {
        Self {
            display_name: display_name.unwrap_or_else(|| NULL_NAME.to_string()),
            image_url: image_url.unwrap_or_else(|| NULL_IMAGE.to_string()),
        }
    }

    /// The pair written when nothing could be resolved.
    pub fn not_found() -> Self {
        Self::new(NULL_NAME, NULL_IMAGE)
    }

    /// Returns true if either field holds a sentinel.
    pub fn is_degraded(&self) -> bool {
        self.display_name == NULL_NAME || self.image_url == NULL_IMAGE
    }
}
