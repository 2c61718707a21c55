use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed to build forecast request for {0}")]
    InvalidRequest(String, #[source] reqwest::Error),

    // Transport failures, including timeouts and body read errors
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} is not valid JSON")]
    Decode {
        url: String,
        /// Start of the response body, for diagnostics.
        excerpt: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Expected a JSON object for a single location, got {found}")]
    UnexpectedShape { found: &'static str },

    #[error("Missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("Key '{key}' must be an object, got {found}")]
    InvalidSection {
        key: &'static str,
        found: &'static str,
    },

    #[error("Missing 'time' data in 'daily'")]
    MissingTime,

    #[error("'daily.time' must be an array, got {found}")]
    InvalidTime { found: &'static str },

    #[error("Could not parse date {value} at row {index}")]
    DateParse { index: usize, value: String },

    #[error("Failed to assemble forecast table")]
    TableConstruction(#[source] PolarsError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create output directory '{0}'")]
    OutputDir(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing CSV file '{0}'")]
    Csv(PathBuf, #[source] PolarsError),

    #[error("Encoding error writing JSON file '{0}'")]
    Json(PathBuf, #[source] serde_json::Error),
}
