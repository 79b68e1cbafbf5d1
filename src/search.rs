//! Search controller
//!
//! Owns the form state of one search page and drives the single request
//! path: validate, normalize, call the flight API, store results or error.
//! Each page request or CLI invocation owns its own controller, so there is
//! nothing to lock. A second `submit` simply overwrites the state of the first.

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::client::FlightApi;
use crate::error::{FlightSearchError, SEARCH_FAILED};
use crate::models::{Flight, SearchParams, SearchQuery};

#[derive(Debug, Clone)]
pub struct SearchController {
    query: SearchQuery,
    flights: Vec<Flight>,
    loading: bool,
    error: Option<String>,
    searched: bool,
    auto_search: bool,
}

impl SearchController {
    /// Blank form with default dates
    #[must_use]
    pub fn new(today: NaiveDate, return_offset_days: u32) -> Self {
        Self::with_query(SearchQuery::with_defaults(today, return_offset_days))
    }

    /// Form prefilled from URL parameters.
    ///
    /// When both airport codes are present, [`Self::run_auto_search`] will search.
    #[must_use]
    pub fn from_params(params: &SearchParams, today: NaiveDate, return_offset_days: u32) -> Self {
        let mut controller =
            Self::with_query(SearchQuery::from_params(params, today, return_offset_days));
        controller.auto_search = params.requests_auto_search();
        controller
    }

    fn with_query(query: SearchQuery) -> Self {
        Self {
            query,
            flights: Vec::new(),
            loading: false,
            error: None,
            searched: false,
            auto_search: false,
        }
    }

    #[must_use]
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    #[must_use]
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// At least one search passed validation
    #[must_use]
    pub fn has_searched(&self) -> bool {
        self.searched
    }

    #[must_use]
    pub fn wants_auto_search(&self) -> bool {
        self.auto_search
    }

    /// Codes are uppercased as they are typed
    pub fn set_departure_code(&mut self, code: &str) {
        self.query.departure_code = code.to_uppercase();
    }

    pub fn set_arrival_code(&mut self, code: &str) {
        self.query.arrival_code = code.to_uppercase();
    }

    pub fn set_departure_date(&mut self, date: NaiveDate) {
        self.query.departure_date = date;
    }

    pub fn set_return_date(&mut self, date: NaiveDate) {
        self.query.return_date = date;
    }

    /// Deep link of the current form state
    #[must_use]
    pub fn deep_link(&self) -> String {
        self.query.normalized().deep_link()
    }

    /// Validate and enter the loading state.
    ///
    /// On success the normalized query to send is returned. On failure the
    /// validation message is stored and no request must be made.
    pub fn begin(&mut self) -> Result<SearchQuery, FlightSearchError> {
        if let Err(err) = self.query.validate() {
            debug!("Search rejected: {}", err);
            self.error = Some(err.user_message());
            return Err(err);
        }

        self.query = self.query.normalized();
        self.loading = true;
        self.error = None;
        self.searched = true;
        Ok(self.query.clone())
    }

    /// Store the outcome of the request started by [`Self::begin`].
    ///
    /// A failure keeps the previous results and sets the generic message.
    pub fn complete(&mut self, result: Result<Vec<Flight>, FlightSearchError>) {
        match result {
            Ok(flights) => {
                info!(
                    "Search {} -> {} returned {} flights",
                    self.query.departure_code,
                    self.query.arrival_code,
                    flights.len()
                );
                self.flights = flights;
            }
            Err(err) => self.record_failure(&err),
        }
        self.loading = false;
    }

    fn record_failure(&mut self, err: &FlightSearchError) {
        error!("Flight search failed: {}", err);
        self.error = Some(SEARCH_FAILED.to_string());
        self.loading = false;
    }

    /// Run one full search against `api`.
    ///
    /// Returns the number of flights found. Errors are also reflected in
    /// [`Self::error`] so the renderer can show them.
    pub async fn submit(&mut self, api: &dyn FlightApi) -> Result<usize, FlightSearchError> {
        let query = self.begin()?;
        match api.search_flights(&query).await {
            Ok(flights) => {
                let count = flights.len();
                self.complete(Ok(flights));
                Ok(count)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Search if the page was loaded with both airport codes in the URL
    pub async fn run_auto_search(
        &mut self,
        api: &dyn FlightApi,
    ) -> Option<Result<usize, FlightSearchError>> {
        if !self.auto_search {
            return None;
        }
        self.auto_search = false;
        Some(self.submit(api).await)
    }
}
