//! This module provides the main entry point of the crate: a client that fetches the daily
//! forecast for one configured location and turns it into a [`ForecastTable`].

use crate::config::{ForecastSettings, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::error::ForecastError;
use crate::forecast_data::error::TransformError;
use crate::forecast_data::fetcher::ForecastFetcher;
use crate::forecast_data::transformer::{json_type_name, ForecastTransformer};
use crate::types::forecast_request::ForecastRequest;
use crate::types::forecast_table::{DegradationReason, ForecastTable};
use bon::bon;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::time::Duration;

/// The client for fetching and reshaping a daily forecast.
///
/// Each call to [`DailyForecast::fetch_table`] is a fresh, independent cycle: one HTTP request,
/// one transform, no caching. Failures are logged here and returned as [`ForecastError`]; the
/// caller decides what "no data" looks like to its users.
///
/// # Examples
///
/// ```no_run
/// # use daily_forecast::{DailyForecast, ForecastError, ForecastRequest, LatLon};
/// # #[tokio::main]
/// # async fn main() -> Result<(), ForecastError> {
/// let client = DailyForecast::builder()
///     .request(
///         ForecastRequest::builder()
///             .location(LatLon(45.5017, -73.5673))
///             .timezone("America/Toronto")
///             .build(),
///     )
///     .build()?;
///
/// let table = client.fetch_table().await?;
/// if let Some(today) = table.first_row() {
///     println!("{}", serde_json::to_string_pretty(&today).unwrap());
/// }
/// # Ok(())
/// # }
/// ```
pub struct DailyForecast {
    fetcher: ForecastFetcher,
    transformer: ForecastTransformer,
}

#[bon]
impl DailyForecast {
    /// Creates a client for `request` (default: the fixed Toronto request), querying
    /// `endpoint` (default: Open-Meteo's forecast API) with a `timeout` per request
    /// (default: 30 seconds).
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`] if the request fails validation, and
    /// [`ForecastError::Fetch`] if the HTTP client can't be built.
    #[builder]
    pub fn new(
        #[builder(default)] request: ForecastRequest,
        #[builder(into, default = DEFAULT_ENDPOINT.to_string())] endpoint: String,
        #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))] timeout: Duration,
    ) -> Result<Self, ForecastError> {
        request.validate()?;
        let transformer = ForecastTransformer::for_request(&request);
        let fetcher = ForecastFetcher::new(request, &endpoint, timeout)?;
        Ok(Self {
            fetcher,
            transformer,
        })
    }

    /// Creates a client from the `[forecast]` section of the configuration file.
    pub fn from_settings(settings: &ForecastSettings) -> Result<Self, ForecastError> {
        Self::builder()
            .request(settings.to_request())
            .endpoint(settings.endpoint.clone())
            .timeout(settings.timeout())
            .build()
    }

    pub fn request(&self) -> &ForecastRequest {
        self.fetcher.request()
    }

    /// Fetches the raw forecast response without transforming it.
    pub async fn fetch_raw(&self) -> Result<Value, ForecastError> {
        Ok(self.fetcher.fetch().await?)
    }

    /// Transforms an already fetched response, logging what was degraded or rejected.
    pub fn transform(&self, raw: &Value) -> Result<ForecastTable, ForecastError> {
        debug!("Raw forecast data type received: {}", json_type_name(raw));
        if let Some(daily) = raw.get("daily").and_then(Value::as_object) {
            debug!(
                "Keys in daily forecast data: {:?}",
                daily.keys().collect::<Vec<_>>()
            );
        }
        if let Some(units) = raw.get("daily_units") {
            debug!("Found daily forecast units: {}", units);
        }

        let table = match self.transformer.transform(raw) {
            Ok(table) => table,
            Err(e) => {
                log_transform_error(&e, raw);
                return Err(e.into());
            }
        };

        for degraded in table.degraded_columns() {
            match degraded.reason {
                DegradationReason::Missing => warn!(
                    "Variable '{}' not found in forecast response. Column '{}' left empty.",
                    degraded.variable, degraded.column
                ),
                _ => error!(
                    "Invalid data for forecast variable '{}' ({}). Column '{}' left empty.",
                    degraded.variable, degraded.reason, degraded.column
                ),
            }
        }
        info!(
            "Processed {} days of forecast data into {} columns.",
            table.height(),
            table.frame().width()
        );
        debug!("Final forecast columns: {:?}", table.column_names());
        debug!("Final forecast table head:\n{}", table.frame().head(Some(5)));
        Ok(table)
    }

    /// Runs one full cycle: fetch, then transform.
    ///
    /// # Errors
    ///
    /// [`ForecastError::Fetch`] when no usable response arrived, [`ForecastError::Transform`]
    /// when the response could not be turned into a table. Both mean "no data".
    pub async fn fetch_table(&self) -> Result<ForecastTable, ForecastError> {
        let raw = match self.fetcher.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to fetch forecast data: {}", e);
                return Err(e.into());
            }
        };
        self.transform(&raw)
    }
}

fn log_transform_error(e: &TransformError, raw: &Value) {
    error!("Invalid data from forecast API: {}", e);
    match e {
        TransformError::UnexpectedShape { found: "array" } => error!(
            "API returned a list. Only single-location responses are supported; \
             was the forecast requested for several coordinates?"
        ),
        TransformError::MissingKey(_) | TransformError::InvalidSection { .. } => {
            let content = raw.to_string();
            error!(
                "Content of data (first 500 chars): {}",
                content.chars().take(500).collect::<String>()
            );
        }
        _ => {}
    }
}
