pub mod config;
mod daily_forecast;
mod error;
mod forecast_data;
pub mod logging;
mod types;
pub mod web;

pub use daily_forecast::DailyForecast;
pub use error::ForecastError;

pub use config::{load_config, AppConfig, ConfigError};

pub use types::forecast_request::{ForecastRequest, LatLon, DEFAULT_DAILY_VARIABLES};
pub use types::forecast_table::{
    DegradationReason, DegradedColumn, ForecastRow, ForecastTable, DATE_COLUMN,
};

pub use forecast_data::error::{ExportError, FetchError, TransformError};
pub use forecast_data::exporter::{save_output_files, write_csv, write_json, ExportReport};
pub use forecast_data::fetcher::ForecastFetcher;
pub use forecast_data::transformer::ForecastTransformer;
