use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use flight_search::config::FlightSearchConfig;
use flight_search::{FlightApi, FlightApiClient, ResultsView, SearchController, logging, web};

/// Flight Search - search imaginary flights from a sample REST API
#[derive(Parser)]
#[command(name = "flight-search")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "FLIGHTSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on, overrides the config file
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search flights and print them
    #[command(alias = "s")]
    Search {
        /// Departure airport code, e.g. BCN
        #[arg(long = "from", default_value = "")]
        departure_code: String,
        /// Arrival airport code, e.g. VVI
        #[arg(long = "to", default_value = "")]
        arrival_code: String,
        /// Departure date (YYYY-MM-DD), defaults to today
        #[arg(long = "depart")]
        departure_date: Option<NaiveDate>,
        /// Return date (YYYY-MM-DD), defaults to 25 days from today
        #[arg(long = "return")]
        return_date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = FlightSearchConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            web::run(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Search {
            departure_code,
            arrival_code,
            departure_date,
            return_date,
        }) => {
            let mut controller = SearchController::new(
                Utc::now().date_naive(),
                config.search.return_offset_days,
            );
            controller.set_departure_code(&departure_code);
            controller.set_arrival_code(&arrival_code);
            if let Some(date) = departure_date {
                controller.set_departure_date(date);
            }
            if let Some(date) = return_date {
                controller.set_return_date(date);
            }

            if cli.verbose {
                println!("Searching via {}", config.api.base_url);
            }

            let client = FlightApiClient::new(&config.api)?;
            let Ok(query) = controller.begin() else {
                print!("{}", ResultsView::from(&controller));
                return Ok(ExitCode::FAILURE);
            };

            // Loading state goes to stderr so stdout only carries the results.
            eprint!("{}", ResultsView::from(&controller));
            let outcome = client.search_flights(&query).await;
            let found = outcome.is_ok();
            controller.complete(outcome);

            print!("{}", ResultsView::from(&controller));
            if found {
                println!();
                println!("🔗 {}", controller.deep_link());
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        None => {
            print_status(&config, cli.config.as_ref(), cli.verbose);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_status(config: &FlightSearchConfig, config_path: Option<&PathBuf>, verbose: bool) {
    println!("Flight Search v{}", flight_search::VERSION);
    println!("Flight API: {}", config.api.base_url);
    println!("Run `flight-search serve` for the web app or `flight-search search --from BCN --to VVI`.");

    if verbose {
        let path = config_path
            .cloned()
            .or_else(FlightSearchConfig::get_config_path)
            .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
        println!("Using config from: {path}");
        println!("Server address: {}", config.bind_address());
        println!("Log level: {}", config.logging.level);
    }
}
