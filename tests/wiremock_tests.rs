//! Integration tests for the forecast client using wiremock
//!
//! These run the public API end to end against a mock Open-Meteo server: fetch, transform,
//! export, and the web endpoint.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use daily_forecast::web::{create_router, AppState};
use daily_forecast::{
    save_output_files, DailyForecast, ForecastError, ForecastRequest, LatLon, TransformError,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// A 16-day response for the default variables, with one variable truncated
fn sixteen_day_response() -> Value {
    let time: Vec<String> = (1..=16).map(|d| format!("2024-07-{:02}", d)).collect();
    let series = |base: f64| -> Vec<f64> { (0..16).map(|d| base + d as f64).collect() };
    json!({
        "latitude": 43.70064,
        "longitude": -79.4,
        "timezone": "America/New_York",
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_mean": "°C",
            "relative_humidity_2m_mean": "%",
            "wind_speed_10m_mean": "km/h",
            "cloud_cover_mean": "%",
            "precipitation_sum": "mm",
            "shortwave_radiation_sum": "MJ/m²",
            "apparent_temperature_mean": "°C",
            "dew_point_2m_mean": "°C"
        },
        "daily": {
            "time": time,
            "temperature_2m_mean": series(20.0),
            "relative_humidity_2m_mean": series(60.0),
            "wind_speed_10m_mean": series(10.0),
            "cloud_cover_mean": series(30.0),
            "precipitation_sum": series(0.0),
            "shortwave_radiation_sum": series(25.0),
            "apparent_temperature_mean": series(21.0),
            "dew_point_2m_mean": [12.0, 12.5]
        }
    })
}

async fn mock_forecast(response: ResponseTemplate) -> (MockServer, DailyForecast) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("forecast_days", "16"))
        .respond_with(response)
        .mount(&server)
        .await;
    #[allow(clippy::expect_used)]
    let client = DailyForecast::builder()
        .endpoint(format!("{}/v1/forecast", server.uri()))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to create client");
    (server, client)
}

#[tokio::test]
async fn test_sixteen_day_forecast_table() {
    let (_server, client) =
        mock_forecast(ResponseTemplate::new(200).set_body_json(sixteen_day_response())).await;

    let table = client.fetch_table().await.unwrap();

    assert_eq!(table.height(), 16);
    assert_eq!(table.column_names().len(), 9);
    assert_eq!(table.column_names()[0], "date");
    assert_eq!(
        table.values("temperature_2m_mean (°C)").unwrap()[15],
        Some(35.0)
    );
    assert_eq!(table.values("dew_point_2m_mean (°C)"), Some(vec![None; 16]));
    assert_eq!(table.degraded_columns().len(), 1);
    assert_eq!(table.degraded_columns()[0].variable, "dew_point_2m_mean");
}

#[tokio::test]
async fn test_custom_location_is_requested() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("latitude", "51.5072"))
        .and(query_param("longitude", "-0.1276"))
        .and(query_param("daily", "precipitation_sum"))
        .and(query_param("timezone", "Europe/London"))
        .and(query_param("forecast_days", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": { "time": ["2024-02-01", "2024-02-02"], "precipitation_sum": [1.2, 0.0] },
            "daily_units": { "precipitation_sum": "mm" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let request = ForecastRequest::builder()
        .location(LatLon(51.5072, -0.1276))
        .variables(vec!["precipitation_sum".to_string()])
        .timezone("Europe/London")
        .forecast_days(2)
        .build();
    let client = DailyForecast::builder()
        .request(request)
        .endpoint(format!("{}/v1/forecast", server.uri()))
        .build()
        .unwrap();

    let table = client.fetch_table().await.unwrap();

    assert_eq!(
        table.column_names(),
        vec!["date".to_string(), "precipitation_sum (mm)".to_string()]
    );
    assert_eq!(
        table.values("precipitation_sum (mm)"),
        Some(vec![Some(1.2), Some(0.0)])
    );
}

#[tokio::test]
async fn test_missing_daily_units_is_a_transform_error() {
    let mut body = sixteen_day_response();
    body.as_object_mut().unwrap().remove("daily_units");
    let (_server, client) =
        mock_forecast(ResponseTemplate::new(200).set_body_json(body)).await;

    let result = client.fetch_table().await;

    assert!(matches!(
        result,
        Err(ForecastError::Transform(TransformError::MissingKey("daily_units")))
    ));
}

#[tokio::test]
async fn test_fetch_and_export() {
    let (_server, client) =
        mock_forecast(ResponseTemplate::new(200).set_body_json(sixteen_day_response())).await;
    let dir = tempfile::tempdir().unwrap();

    let table = client.fetch_table().await.unwrap();
    let report = save_output_files(&table, dir.path(), "forecast.csv", "forecast.json");

    assert!(report.is_complete());
    let csv = std::fs::read_to_string(dir.path().join("forecast.csv")).unwrap();
    assert_eq!(csv.lines().count(), 17);
    let json: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("forecast.json")).unwrap())
            .unwrap();
    assert_eq!(json.len(), 16);
    assert_eq!(json[0]["date"], json!("2024-07-01"));
    assert!(json[0]["dew_point_2m_mean (°C)"].is_null());
}

#[tokio::test]
async fn test_web_endpoint_serves_today() {
    let (_server, client) =
        mock_forecast(ResponseTemplate::new(200).set_body_json(sixteen_day_response())).await;
    let app = create_router(AppState::new(client));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/weather")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let today: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(today["date"], json!("2024-07-01"));
    assert_eq!(today["relative_humidity_2m_mean (%)"], json!(60.0));
}

#[tokio::test]
async fn test_web_endpoint_reports_no_data_for_invalid_body() {
    let (_server, client) =
        mock_forecast(ResponseTemplate::new(200).set_body_string("not json")).await;
    let app = create_router(AppState::new(client));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/weather")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "No data" }));
}
