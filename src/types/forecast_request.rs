//! Defines the immutable description of a single-location daily forecast request.

use crate::config::ConfigError;
use bon::Builder;
use std::collections::HashSet;

/// Daily variables requested when none are configured, in column order.
pub const DEFAULT_DAILY_VARIABLES: [&str; 8] = [
    "temperature_2m_mean",
    "relative_humidity_2m_mean",
    "wind_speed_10m_mean",
    "cloud_cover_mean",
    "precipitation_sum",
    "shortwave_radiation_sum",
    "apparent_temperature_mean",
    "dew_point_2m_mean",
];

/// Toronto, the location the forecast is fetched for unless configured otherwise.
pub const DEFAULT_LOCATION: LatLon = LatLon(43.7064, -79.3986);

pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Open-Meteo serves at most 16 days of daily forecast.
pub const MAX_FORECAST_DAYS: u8 = 16;

/// The response key holding the date sequence; it can't double as a variable name.
pub(crate) const TIME_KEY: &str = "time";

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use daily_forecast::LatLon;
///
/// let toronto = LatLon(43.7064, -79.3986);
/// assert_eq!(toronto.0, 43.7064); // Latitude
/// assert_eq!(toronto.1, -79.3986); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Everything the forecast API needs to know about one request: where, what, in which
/// timezone and how many days ahead.
///
/// Construct it with the builder; every field has a default matching the fixed Toronto setup.
///
/// # Examples
///
/// ```
/// use daily_forecast::{ForecastRequest, LatLon};
///
/// let request = ForecastRequest::builder()
///     .location(LatLon(52.52, 13.405))
///     .variables(vec!["temperature_2m_mean".to_string()])
///     .timezone("Europe/Berlin")
///     .forecast_days(7)
///     .build();
///
/// assert_eq!(request.forecast_days(), 7);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ForecastRequest {
    #[builder(default = DEFAULT_LOCATION)]
    location: LatLon,
    #[builder(default = default_variables())]
    variables: Vec<String>,
    #[builder(into, default = DEFAULT_TIMEZONE.to_owned())]
    timezone: String,
    #[builder(default = MAX_FORECAST_DAYS)]
    forecast_days: u8,
}

fn default_variables() -> Vec<String> {
    DEFAULT_DAILY_VARIABLES
        .iter()
        .map(|v| v.to_string())
        .collect()
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ForecastRequest {
    pub fn location(&self) -> LatLon {
        self.location
    }

    /// The requested daily variables, in the order their columns will appear.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn forecast_days(&self) -> u8 {
        self.forecast_days
    }

    /// Checks that the request can be answered by the forecast API.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for out-of-range coordinates, a horizon outside `1..=16`
    /// days, an empty variable list, duplicated variables, or a variable named `time`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let LatLon(latitude, longitude) = self.location;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidLongitude(longitude));
        }
        if !(1..=MAX_FORECAST_DAYS).contains(&self.forecast_days) {
            return Err(ConfigError::InvalidForecastDays(self.forecast_days));
        }
        if self.variables.is_empty() {
            return Err(ConfigError::NoVariables);
        }

        let mut seen = HashSet::with_capacity(self.variables.len());
        for variable in &self.variables {
            if variable == TIME_KEY {
                return Err(ConfigError::ReservedVariable(variable.clone()));
            }
            if !seen.insert(variable.as_str()) {
                return Err(ConfigError::DuplicateVariable(variable.clone()));
            }
        }
        Ok(())
    }

    /// Query parameters for the forecast endpoint, in the order the API documents them.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.location.0.to_string()),
            ("longitude", self.location.1.to_string()),
            ("daily", self.variables.join(",")),
            ("timezone", self.timezone.clone()),
            ("forecast_days", self.forecast_days.to_string()),
        ]
    }
}
