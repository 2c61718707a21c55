//! Route handlers

use crate::web::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use log::{info, warn};
use serde_json::{json, Value};

const INDEX_PAGE: &str = include_str!("../../static/index.html");

/// The static forecast page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Today's forecast as a flat JSON object. Re-fetches on every request.
pub async fn current_weather(State(state): State<AppState>) -> Response {
    match state.forecast.fetch_table().await {
        Ok(table) => match table.first_row() {
            Some(row) => {
                let date = row.get("date").and_then(Value::as_str).unwrap_or("unknown date");
                info!("Serving forecast for {}", date);
                Json(row).into_response()
            }
            None => {
                warn!("Forecast table is empty");
                no_data()
            }
        },
        // Already logged by the client
        Err(_) => no_data(),
    }
}

fn no_data() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "No data" })),
    )
        .into_response()
}
