//! Data models for the flight search application
//!
//! - Query: origin, destination and dates of a search, plus its URL encoding
//! - Flight: one itinerary as returned by the flight API

pub mod flight;
pub mod query;

pub use flight::Flight;
pub use query::{SearchParams, SearchQuery};
