//! JSON endpoints under `/api`

use axum::{Json, Router, extract::Query, routing::get};
use serde::{Deserialize, Serialize};
use tracing::info;

mod error;

pub use error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SaveParams {
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    /// Length in UTF-16 code units, as a browser counts it
    pub text_length: usize,
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/save", get(save_text))
}

/// Logs the text and reports its length. Nothing is stored.
async fn save_text(Query(params): Query<SaveParams>) -> Result<Json<SaveResponse>, ApiError> {
    let text = params
        .text
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing text parameter"))?;

    info!("Received text: {}", text);

    Ok(Json(SaveResponse {
        success: true,
        message: "Text received successfully".to_string(),
        text_length: text.encode_utf16().count(),
    }))
}
