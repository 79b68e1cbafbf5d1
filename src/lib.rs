//! Flight Search - query a flight API and render the itineraries
//!
//! The library holds the search controller, the results renderer, the
//! flight API client and the web server that puts them behind a browser page.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod search;
pub mod web;

// Re-export core types for public API
pub use client::{FlightApi, FlightApiClient};
pub use config::FlightSearchConfig;
pub use error::FlightSearchError;
pub use models::{Flight, SearchParams, SearchQuery};
pub use render::{FlightCard, ResultsView};
pub use search::SearchController;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
