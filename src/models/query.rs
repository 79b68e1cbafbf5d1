//! Search query model and its deep-link encoding

use chrono::{DateTime, Days, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FlightSearchError, MISSING_AIRPORT_CODES};

/// Raw search parameters as they appear in a URL or a submitted form.
///
/// Every field is optional; [`SearchQuery::from_params`] fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchParams {
    pub departure_airport_code: Option<String>,
    pub arrival_airport_code: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
}

impl SearchParams {
    /// Both airport codes are present, so a page load should search right away
    #[must_use]
    pub fn requests_auto_search(&self) -> bool {
        is_present(self.departure_airport_code.as_deref())
            && is_present(self.arrival_airport_code.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Origin, destination and travel dates of one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Departure airport code, e.g. `BCN`
    pub departure_code: String,
    /// Arrival airport code, e.g. `VVI`
    pub arrival_code: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl SearchQuery {
    /// Empty codes, departing `today` and returning `return_offset_days` later
    #[must_use]
    pub fn with_defaults(today: NaiveDate, return_offset_days: u32) -> Self {
        Self {
            departure_code: String::new(),
            arrival_code: String::new(),
            departure_date: today,
            return_date: default_return_date(today, return_offset_days),
        }
    }

    /// Build a query from URL or form parameters.
    ///
    /// Dates that are missing or cannot be parsed fall back to the defaults.
    #[must_use]
    pub fn from_params(params: &SearchParams, today: NaiveDate, return_offset_days: u32) -> Self {
        let defaults = Self::with_defaults(today, return_offset_days);
        Self {
            departure_code: params.departure_airport_code.clone().unwrap_or_default(),
            arrival_code: params.arrival_airport_code.clone().unwrap_or_default(),
            departure_date: params
                .departure_date
                .as_deref()
                .and_then(parse_date_param)
                .unwrap_or(defaults.departure_date),
            return_date: params
                .return_date
                .as_deref()
                .and_then(parse_date_param)
                .unwrap_or(defaults.return_date),
        }
    }

    /// Fails when either airport code is blank. Nothing else is checked.
    pub fn validate(&self) -> Result<(), FlightSearchError> {
        if self.departure_code.trim().is_empty() || self.arrival_code.trim().is_empty() {
            return Err(FlightSearchError::validation(MISSING_AIRPORT_CODES));
        }
        Ok(())
    }

    /// Copy with trimmed, uppercased airport codes
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            departure_code: self.departure_code.trim().to_uppercase(),
            arrival_code: self.arrival_code.trim().to_uppercase(),
            departure_date: self.departure_date,
            return_date: self.return_date,
        }
    }

    /// The four parameters in wire order, dates as timestamps
    #[must_use]
    pub fn to_params(&self) -> [(&'static str, String); 4] {
        [
            ("DepartureAirportCode", self.departure_code.clone()),
            ("ArrivalAirportCode", self.arrival_code.clone()),
            ("DepartureDate", format_timestamp(self.departure_date)),
            ("ReturnDate", format_timestamp(self.return_date)),
        ]
    }

    /// Percent-encoded query string shared by the deep link and the API request
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Visible URL of the search page for this query
    #[must_use]
    pub fn deep_link(&self) -> String {
        format!("/search?{}", self.to_query_string())
    }
}

fn default_return_date(today: NaiveDate, return_offset_days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(return_offset_days)))
        .unwrap_or(today)
}

/// Midnight UTC of `date` with millisecond precision: `2024-05-01T00:00:00.000Z`
#[must_use]
pub fn format_timestamp(date: NaiveDate) -> String {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts a full RFC 3339 timestamp or a plain `YYYY-MM-DD` date
#[must_use]
pub fn parse_date_param(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
