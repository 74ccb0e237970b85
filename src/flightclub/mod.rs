//! Flight Club-specific modules for HTTP transport, sessions, parsing, and data models.

pub mod catalog;
pub mod client;
pub mod models;
pub mod parser;
pub mod resolver;
pub mod selectors;
pub mod session;

pub use client::{CatalogSource, FlightClubClient};
pub use models::{CatalogCandidate, ResolvedItem};
pub use parser::Parser;
pub use resolver::{build_resolver, CatalogResolver, ItemResolver, SearchResolver};
pub use session::{BrowserSession, HttpSessionFactory, SessionFactory};
