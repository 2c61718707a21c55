//! Application configuration, read from an optional TOML file.
//!
//! Every section and key has a default, so a missing file or a partial one still yields a
//! complete [`AppConfig`] describing the fixed Toronto forecast.

use crate::types::forecast_request::{
    ForecastRequest, LatLon, DEFAULT_DAILY_VARIABLES, DEFAULT_LOCATION, DEFAULT_TIMEZONE,
    MAX_FORECAST_DAYS,
};
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse configuration file '{0}'")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Latitude {0} is outside -90..=90")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside -180..=180")]
    InvalidLongitude(f64),

    #[error("Forecast days {0} is outside 1..=16")]
    InvalidForecastDays(u8),

    #[error("At least one daily variable must be requested")]
    NoVariables,

    #[error("Daily variable '{0}' is requested more than once")]
    DuplicateVariable(String),

    #[error("'{0}' is reserved for the date sequence and can't be requested as a variable")]
    ReservedVariable(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub forecast: ForecastSettings,
    pub server: ServerSettings,
    pub files: FileSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub forecast_days: u8,
    pub variables: Vec<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LOCATION.0,
            longitude: DEFAULT_LOCATION.1,
            timezone: DEFAULT_TIMEZONE.to_string(),
            forecast_days: MAX_FORECAST_DAYS,
            variables: DEFAULT_DAILY_VARIABLES
                .iter()
                .map(|v| v.to_string())
                .collect(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ForecastSettings {
    pub fn to_request(&self) -> ForecastRequest {
        ForecastRequest::builder()
            .location(LatLon(self.latitude, self.longitude))
            .variables(self.variables.clone())
            .timezone(self.timezone.clone())
            .forecast_days(self.forecast_days)
            .build()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Relative paths resolve against the working directory.
    pub output_dir: PathBuf,
    pub csv_file: String,
    pub json_file: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            csv_file: "forecast_daily_weather.csv".to_string(),
            json_file: "forecast_daily_weather.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_file: PathBuf,
    pub file_level: LevelFilter,
    pub console_level: LevelFilter,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("forecast_fetch_log.txt"),
            file_level: LevelFilter::Debug,
            console_level: LevelFilter::Info,
        }
    }
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(config_path)
        .map_err(|e| ConfigError::Read(config_path.to_path_buf(), e))?;
    parse_config(&text).map_err(|e| ConfigError::Parse(config_path.to_path_buf(), e))
}

fn parse_config(text: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.forecast.to_request(), ForecastRequest::default());
        assert_eq!(config.forecast.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.forecast.timeout(), Duration::from_secs(30));
        assert_eq!(config.server.address(), "127.0.0.1:5000");
        assert_eq!(config.files.csv_file, "forecast_daily_weather.csv");
        assert_eq!(config.logging.file_level, LevelFilter::Debug);
        assert_eq!(config.logging.console_level, LevelFilter::Info);
    }

    #[test]
    fn test_partial_config_overrides_only_given_keys() {
        let config = parse_config(
            r#"
            [forecast]
            latitude = 45.5017
            longitude = -73.5673
            variables = ["precipitation_sum", "cloud_cover_mean"]

            [server]
            port = 8080

            [logging]
            console_level = "warn"
            "#,
        )
        .unwrap();

        let request = config.forecast.to_request();
        assert_eq!(request.location(), LatLon(45.5017, -73.5673));
        assert_eq!(request.variables(), ["precipitation_sum", "cloud_cover_mean"]);
        assert_eq!(request.timezone(), DEFAULT_TIMEZONE);
        assert_eq!(request.forecast_days(), 16);
        assert_eq!(config.server.address(), "127.0.0.1:8080");
        assert_eq!(config.logging.console_level, LevelFilter::Warn);
        assert_eq!(config.logging.file_level, LevelFilter::Debug);
    }

    #[test]
    fn test_load_config_reports_path_on_errors() {
        let missing = Path::new("/definitely/not/here.toml");
        assert!(matches!(
            load_config(missing),
            Err(ConfigError::Read(p, _)) if p == missing
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\nforecast_days = \"sixteen\"").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_, _))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[files]\noutput_dir = \"exports\"\njson_file = \"today.json\""
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.files.output_dir, PathBuf::from("exports"));
        assert_eq!(config.files.json_file, "today.json");
        assert_eq!(config.files.csv_file, "forecast_daily_weather.csv");
    }
}
