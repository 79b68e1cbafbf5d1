use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Form, Router,
    extract::{Query, State, rejection::QueryRejection},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{self, ApiError};
use crate::client::{FlightApi, FlightApiClient};
use crate::config::FlightSearchConfig;
use crate::models::SearchParams;
use crate::render;
use crate::search::SearchController;

/// Shared by all page handlers
#[derive(Clone)]
pub struct AppState {
    pub flight_api: Arc<dyn FlightApi>,
    pub return_offset_days: u32,
}

impl AppState {
    pub fn new(flight_api: Arc<dyn FlightApi>, config: &FlightSearchConfig) -> Self {
        Self {
            flight_api,
            return_offset_days: config.search.return_offset_days,
        }
    }

    fn controller(&self, params: &SearchParams) -> SearchController {
        SearchController::from_params(params, Utc::now().date_naive(), self.return_offset_days)
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_page))
        .route("/search", get(search_page).post(submit_search))
        .nest("/api", api::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: &FlightSearchConfig) -> Result<()> {
    let flight_api = FlightApiClient::new(&config.api)?;
    let app = router(AppState::new(Arc::new(flight_api), config));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down web server");
}

async fn home_page() -> Result<Html<String>, ApiError> {
    Ok(Html(render::render_home_page()?))
}

/// Page load. Searches right away when the URL carries both airport codes.
async fn search_page(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    // A malformed deep link still gets the page, just without a search.
    let params = params.map_or_else(
        |rejection| {
            tracing::warn!("Ignoring malformed search link: {}", rejection);
            SearchParams::default()
        },
        |Query(params)| params,
    );
    let mut controller = state.controller(&params);
    // Failures are already stored in the controller and rendered below.
    let _ = controller.run_auto_search(state.flight_api.as_ref()).await;
    Ok(Html(render::render_search_page(&controller)?))
}

/// Form submission. Valid input is redirected to its deep link, which runs
/// the search; invalid input is shown again with the validation message.
async fn submit_search(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Result<Response, ApiError> {
    let mut controller = state.controller(&params);
    match controller.begin() {
        Ok(query) => Ok(Redirect::to(&query.deep_link()).into_response()),
        Err(_) => Ok(Html(render::render_search_page(&controller)?).into_response()),
    }
}
