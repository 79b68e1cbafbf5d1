//! Flight itinerary as returned by the flight API

use serde::{Deserialize, Deserializer, Serialize};

/// One priced round-trip offer.
///
/// Field names follow the API's PascalCase JSON. Absent or `null` fields fall
/// back to empty values instead of rejecting the whole response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Flight {
    #[serde(deserialize_with = "null_as_default")]
    pub airline_logo_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub airline_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub inbound_flights_duration: String,
    #[serde(deserialize_with = "null_as_default")]
    pub itinerary_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub outbound_flights_duration: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stops: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_amount: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Flight {
    /// Total amount in dollars with two decimals, e.g. `$1234.50`
    #[must_use]
    pub fn format_amount(&self) -> String {
        format!("${:.2}", self.total_amount)
    }

    #[must_use]
    pub fn has_logo(&self) -> bool {
        !self.airline_logo_address.is_empty()
    }

    #[must_use]
    pub fn format_stops(&self) -> String {
        match self.stops {
            0 => "Direct".to_string(),
            1 => "1 stop".to_string(),
            n => format!("{n} stops"),
        }
    }
}
