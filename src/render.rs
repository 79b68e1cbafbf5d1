//! Results renderer
//!
//! Pure functions of the controller state. [`ResultsView`] decides what is
//! visible; the HTML and text outputs only lay it out.

use std::fmt::{self, Display};

use minijinja::{Environment, context};
use serde::Serialize;

use crate::models::Flight;
use crate::search::SearchController;

/// Shown when a finished search returned nothing and did not fail.
pub const NO_FLIGHTS_FOUND: &str = "No flights found for this search.";

const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html.jinja");
const HOME_TEMPLATE: &str = include_str!("templates/home.html.jinja");
const SEARCH_TEMPLATE: &str = include_str!("templates/search.html.jinja");

/// Display model of one itinerary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightCard {
    pub airline_name: String,
    /// `None` when the API sent no logo address
    pub logo_url: Option<String>,
    /// e.g. `$1234.50`
    pub amount: String,
    pub outbound_duration: String,
    pub inbound_duration: String,
    pub stops: String,
    pub itinerary_id: String,
}

impl From<&Flight> for FlightCard {
    fn from(flight: &Flight) -> Self {
        Self {
            airline_name: flight.airline_name.clone(),
            logo_url: flight
                .has_logo()
                .then(|| flight.airline_logo_address.clone()),
            amount: flight.format_amount(),
            outbound_duration: flight.outbound_flights_duration.clone(),
            inbound_duration: flight.inbound_flights_duration.clone(),
            stops: flight.format_stops(),
            itinerary_id: flight.itinerary_id.clone(),
        }
    }
}

impl Display for FlightCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "✈️ {} {}", self.airline_name, self.amount)?;
        writeln!(f, "   ↑ Outbound Duration: {}", self.outbound_duration)?;
        writeln!(f, "   ↓ Inbound Duration: {}", self.inbound_duration)?;
        writeln!(f, "   {}", self.stops)
    }
}

/// What the results area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub loading: bool,
    pub error: Option<String>,
    /// Cards, present only after a finished search with results
    pub flights: Vec<FlightCard>,
    /// Finished search, nothing found, no error
    pub empty: bool,
}

impl ResultsView {
    /// Decide what is visible.
    ///
    /// Results from an earlier search stay visible next to an error banner.
    #[must_use]
    pub fn build(flights: &[Flight], loading: bool, error: Option<&str>, searched: bool) -> Self {
        let finished = searched && !loading;
        Self {
            loading,
            error: error.map(str::to_string),
            flights: if finished {
                flights.iter().map(FlightCard::from).collect()
            } else {
                Vec::new()
            },
            empty: finished && flights.is_empty() && error.is_none(),
        }
    }
}

impl From<&SearchController> for ResultsView {
    fn from(controller: &SearchController) -> Self {
        Self::build(
            controller.flights(),
            controller.is_loading(),
            controller.error(),
            controller.has_searched(),
        )
    }
}

impl Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.loading {
            writeln!(f, "Searching for flights...")?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "❌ {error}")?;
        }
        if self.empty {
            writeln!(f, "{NO_FLIGHTS_FOUND}")?;
        }
        if !self.flights.is_empty() {
            writeln!(f, "Flights")?;
            for card in &self.flights {
                writeln!(f)?;
                write!(f, "{card}")?;
            }
        }
        Ok(())
    }
}

/// Form values as the date inputs expect them
#[derive(Debug, Serialize)]
struct FormView {
    departure_code: String,
    arrival_code: String,
    departure_date: String,
    return_date: String,
}

fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("layout.html", LAYOUT_TEMPLATE)?;
    env.add_template("home.html", HOME_TEMPLATE)?;
    env.add_template("search.html", SEARCH_TEMPLATE)?;
    Ok(env)
}

/// Welcome page
pub fn render_home_page() -> Result<String, minijinja::Error> {
    let env = environment()?;
    env.get_template("home.html")?.render(context! {})
}

/// Search form plus results for the current controller state
pub fn render_search_page(controller: &SearchController) -> Result<String, minijinja::Error> {
    let env = environment()?;
    let query = controller.query();
    let form = FormView {
        departure_code: query.departure_code.clone(),
        arrival_code: query.arrival_code.clone(),
        departure_date: query.departure_date.format("%Y-%m-%d").to_string(),
        return_date: query.return_date.format("%Y-%m-%d").to_string(),
    };
    let results = ResultsView::from(controller);

    env.get_template("search.html")?.render(context! {
        form,
        results,
        no_flights_message => NO_FLIGHTS_FOUND,
    })
}
