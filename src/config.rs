//! Tool configuration: TOML file, then `GYS_*` environment variables, then CLI flags.

use crate::flightclub::selectors;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "gys-scraper";

/// Site, transport, and selector settings.
///
/// Per-run settings live in the run descriptor instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site root that descriptor paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Search endpoint, appended to `base_url` and followed by the item id
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// How candidates are turned into name/image pairs
    #[serde(default)]
    pub strategy: Strategy,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Selectors tried in order for the shoe name
    #[serde(default = "default_name_selectors")]
    pub name_selectors: Vec<String>,

    /// Selectors tried in order for the shoe image
    #[serde(default = "default_image_selectors")]
    pub image_selectors: Vec<String>,
}

fn default_base_url() -> String {
    "https://www.flightclub.com".to_string()
}

fn default_search_path() -> String {
    "/catalogsearch/result/?q=".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_name_selectors() -> Vec<String> {
    selectors::item::NAME_CHAIN.iter().map(|s| s.to_string()).collect()
}

fn default_image_selectors() -> Vec<String> {
    selectors::item::IMAGE_CHAIN.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            strategy: Strategy::Search,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            name_selectors: default_name_selectors(),
            image_selectors: default_image_selectors(),
        }
    }
}

impl Config {
    /// Reads a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading config {}", path.display());

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads the first config found: `explicit_path`, then `./config.toml`,
    /// then `<config dir>/gys-scraper/config.toml`. Falls back to defaults.
    ///
    /// An explicit path that cannot be read is an error; the other locations
    /// are only used if they exist.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let candidates = std::iter::once(PathBuf::from(CONFIG_FILE))
            .chain(dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE)));

        for candidate in candidates {
            if candidate.is_file() {
                return Self::from_file(candidate);
            }
        }

        debug!("No {} found, using built-in defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("GYS_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(proxy) = std::env::var("GYS_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(strategy) = std::env::var("GYS_STRATEGY") {
            match strategy.parse() {
                Ok(strategy) => self.strategy = strategy,
                Err(e) => warn!("Ignoring GYS_STRATEGY: {}", e),
            }
        }

        self
    }

    /// Returns the site root without a trailing slash.
    pub fn site_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Builds the catalog URL for a descriptor `site` value.
    ///
    /// Absolute URLs are used as they are.
    pub fn catalog_url(&self, site: &str) -> String {
        if site.starts_with("http://") || site.starts_with("https://") {
            return site.to_string();
        }
        format!("{}/{}", self.site_root(), site.trim_start_matches('/'))
    }

    /// Builds the search URL for an item id.
    pub fn search_url(&self, id: &str) -> String {
        format!("{}{}{}", self.site_root(), self.search_path, urlencoding::encode(id))
    }
}

/// Item resolution strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Search the site for each id and scrape the item page
    #[default]
    Search,
    /// Use the data embedded in the catalog payload
    Catalog,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "search" | "scrape" => Ok(Strategy::Search),
            "catalog" | "inline" => Ok(Strategy::Catalog),
            _ => Err(format!("Unknown strategy: {}. Use: search, catalog", s)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Search => write!(f, "search"),
            Strategy::Catalog => write!(f, "catalog"),
        }
    }
}
