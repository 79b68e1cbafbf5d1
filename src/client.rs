//! Flight API client
//!
//! One outbound GET per search against the remote flight API. There is no
//! retry and no rate limiting: every failure is reported to the caller as a
//! request error and the caller decides what the user sees.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::FlightSearchError;
use crate::config::ApiConfig;
use crate::models::{Flight, SearchQuery};

/// Source of flight itineraries
#[async_trait]
pub trait FlightApi: Send + Sync {
    /// Fetch itineraries for an already validated and normalized query
    async fn search_flights(&self, query: &SearchQuery) -> Result<Vec<Flight>, FlightSearchError>;
}

/// HTTP client for the remote flight API
#[derive(Clone)]
pub struct FlightApiClient {
    client: Client,
    base_url: String,
}

impl FlightApiClient {
    /// Create a new client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, FlightSearchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds.into()));
        }

        let client = builder.build().map_err(|e| {
            FlightSearchError::config(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full request URL for a query
    #[must_use]
    pub fn search_url(&self, query: &SearchQuery) -> String {
        format!("{}/api/flight/?{}", self.base_url, query.to_query_string())
    }
}

#[async_trait]
impl FlightApi for FlightApiClient {
    #[instrument(skip(self, query), fields(from = %query.departure_code, to = %query.arrival_code))]
    async fn search_flights(&self, query: &SearchQuery) -> Result<Vec<Flight>, FlightSearchError> {
        let url = self.search_url(query);
        debug!("Flight API request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FlightSearchError::request(format!("Flight API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Flight API answered with HTTP {}", status);
            return Err(FlightSearchError::request(format!(
                "Flight API request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let flights: Vec<Flight> = response.json().await.map_err(|e| {
            FlightSearchError::request(format!("Failed to parse flight API response: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} flights in {:.3}s",
            flights.len(),
            total_duration.as_secs_f64()
        );

        if total_duration.as_secs() > 5 {
            warn!(
                "Slow flight API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(flights)
    }
}
