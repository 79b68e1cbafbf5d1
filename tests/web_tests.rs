//! Router tests against a fake flight API served on an ephemeral port

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use flight_search::config::{ApiConfig, FlightSearchConfig};
use flight_search::error::{MISSING_AIRPORT_CODES, SEARCH_FAILED};
use flight_search::render::NO_FLIGHTS_FOUND;
use flight_search::web::{self, AppState};
use flight_search::FlightApiClient;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// What the fake flight API answers with
#[derive(Clone)]
enum Upstream {
    Flights(Value),
    Status(StatusCode),
    Raw(&'static str),
}

#[derive(Clone)]
struct FakeFlightApi {
    upstream: Upstream,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn fake_flights(
    State(fake): State<FakeFlightApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.requests.lock().unwrap().push(params);
    match fake.upstream {
        Upstream::Flights(body) => Json(body).into_response(),
        Upstream::Status(status) => status.into_response(),
        Upstream::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
    }
}

/// Serves the fake flight API and returns the app router wired to it
async fn spawn_app(upstream: Upstream) -> (Router, Arc<Mutex<Vec<HashMap<String, String>>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeFlightApi {
        upstream,
        requests: requests.clone(),
    };
    let upstream_app = Router::new()
        .route("/api/flight/", get(fake_flights))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream_app).await.unwrap();
    });

    let mut config = FlightSearchConfig::default();
    config.api = ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_seconds: 10,
        ..ApiConfig::default()
    };
    let client = FlightApiClient::new(&config.api).unwrap();
    let app = web::router(AppState::new(Arc::new(client), &config));
    (app, requests)
}

fn sample_flights() -> Value {
    json!([
        {
            "AirlineLogoAddress": "https://example.com/ib.png",
            "AirlineName": "Iberia",
            "InboundFlightsDuration": "24:10",
            "ItineraryId": "it-1",
            "OutboundFlightsDuration": "20:05",
            "Stops": 1,
            "TotalAmount": 1234.5
        },
        {
            "AirlineLogoAddress": "",
            "AirlineName": "LATAM",
            "InboundFlightsDuration": "22:00",
            "ItineraryId": "it-2",
            "OutboundFlightsDuration": "21:45",
            "Stops": 2,
            "TotalAmount": 899
        }
    ])
}

async fn get_page(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_home_page() {
    let (app, _) = spawn_app(Upstream::Flights(json!([]))).await;

    let response = get_page(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome"));
    assert!(html.contains("href=\"/search\""));
}

#[tokio::test]
async fn test_search_page_without_params_does_not_search() {
    let (app, requests) = spawn_app(Upstream::Flights(sample_flights())).await;

    let response = get_page(&app, "/search").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(requests.lock().unwrap().is_empty());
    assert!(!html.contains(NO_FLIGHTS_FOUND));
    assert!(!html.contains(MISSING_AIRPORT_CODES));
}

#[tokio::test]
async fn test_deep_link_auto_searches_with_uppercased_codes() {
    let (app, requests) = spawn_app(Upstream::Flights(sample_flights())).await;

    let response = get_page(
        &app,
        "/search?DepartureAirportCode=bcn&ArrivalAirportCode=vvi\
         &DepartureDate=2030-06-10T00:00:00.000Z&ReturnDate=2030-07-05",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["DepartureAirportCode"], "BCN");
    assert_eq!(requests[0]["ArrivalAirportCode"], "VVI");
    assert_eq!(requests[0]["DepartureDate"], "2030-06-10T00:00:00.000Z");
    assert_eq!(requests[0]["ReturnDate"], "2030-07-05T00:00:00.000Z");

    assert_eq!(html.matches("class=\"flight\"").count(), 2);
    assert!(html.contains("Iberia"));
    assert!(html.contains("$1234.50"));
    assert!(html.contains("LATAM"));
    assert!(html.contains("$899.00"));
    assert!(html.contains("value=\"BCN\""));
}

#[tokio::test]
async fn test_zero_results_render_empty_state() {
    let (app, _) = spawn_app(Upstream::Flights(json!([]))).await;

    let html = body_text(
        get_page(&app, "/search?DepartureAirportCode=BCN&ArrivalAirportCode=VVI").await,
    )
    .await;

    assert!(html.contains(NO_FLIGHTS_FOUND));
    assert!(!html.contains(SEARCH_FAILED));
}

#[tokio::test]
async fn test_upstream_failure_renders_generic_error() {
    let (app, requests) = spawn_app(Upstream::Status(StatusCode::INTERNAL_SERVER_ERROR)).await;

    let response = get_page(&app, "/search?DepartureAirportCode=BCN&ArrivalAirportCode=VVI").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert_eq!(requests.lock().unwrap().len(), 1);
    assert!(html.contains(SEARCH_FAILED));
    assert!(!html.contains(NO_FLIGHTS_FOUND));
    assert!(html.contains("id=\"loading\" class=\"muted\" hidden"));
}

#[tokio::test]
async fn test_undecodable_body_renders_generic_error() {
    let (app, requests) = spawn_app(Upstream::Raw("not json")).await;

    let response = get_page(&app, "/search?DepartureAirportCode=BCN&ArrivalAirportCode=VVI").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert_eq!(requests.lock().unwrap().len(), 1);
    assert!(html.contains(SEARCH_FAILED));
    assert!(!html.contains(NO_FLIGHTS_FOUND));
}

#[tokio::test]
async fn test_repeated_query_key_still_renders_page() {
    let (app, requests) = spawn_app(Upstream::Flights(sample_flights())).await;

    let response = get_page(
        &app,
        "/search?DepartureAirportCode=bcn&DepartureAirportCode=mad&ArrivalAirportCode=vvi",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains("id=\"search-form\""));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_form_submit_with_blank_code_shows_validation_error() {
    let (app, requests) = spawn_app(Upstream::Flights(sample_flights())).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/search")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "DepartureAirportCode=BCN&ArrivalAirportCode=&DepartureDate=2030-06-10",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(MISSING_AIRPORT_CODES));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_form_submit_redirects_to_deep_link() {
    let (app, requests) = spawn_app(Upstream::Flights(sample_flights())).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/search")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "DepartureAirportCode=bcn&ArrivalAirportCode=vvi\
                     &DepartureDate=2030-06-10&ReturnDate=2030-07-05",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(
        location,
        "/search?DepartureAirportCode=BCN&ArrivalAirportCode=VVI\
         &DepartureDate=2030-06-10T00%3A00%3A00.000Z&ReturnDate=2030-07-05T00%3A00%3A00.000Z"
    );
    assert!(requests.lock().unwrap().is_empty());

    // Following the redirect runs the search; loading it twice repeats it exactly.
    get_page(&app, &location).await;
    get_page(&app, &location).await;
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn test_save_without_text_is_bad_request() {
    let (app, _) = spawn_app(Upstream::Flights(json!([]))).await;

    let response = get_page(&app, "/api/save").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "Missing text parameter");
}

#[tokio::test]
async fn test_save_echoes_length() {
    let (app, _) = spawn_app(Upstream::Flights(json!([]))).await;

    let response = get_page(&app, "/api/save?text=hello").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["textLength"], 5);
    assert_eq!(body["message"], "Text received successfully");
}
