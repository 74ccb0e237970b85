//! gys-scraper - Guess Your Sneaker shoe file generator
//!
//! Scrapes a Flight Club catalog page into numbered `{"name", "img"}` JSON
//! files, with TLS fingerprint emulation for reliable fetching.

pub mod commands;
pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod filters;
pub mod flightclub;
pub mod prompt;

pub use config::{Config, Strategy};
pub use descriptor::{DescriptorError, RunDescriptor};
pub use flightclub::models::{CatalogCandidate, ResolvedItem};
