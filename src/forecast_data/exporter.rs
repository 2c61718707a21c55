//! Writes a [`ForecastTable`] to flat files.
//!
//! CSV goes through polars' CSV writer; JSON is an array of the table's row objects so that the
//! files match what the web endpoint serves.

use crate::forecast_data::error::ExportError;
use crate::types::forecast_table::ForecastTable;
use log::{error, info};
use polars::prelude::{CsvWriter, SerWriter};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of [`save_output_files`]; each format succeeds or fails on its own.
#[derive(Debug)]
pub struct ExportReport {
    pub csv: Result<PathBuf, ExportError>,
    pub json: Result<PathBuf, ExportError>,
}

impl ExportReport {
    /// `true` when both files were written.
    pub fn is_complete(&self) -> bool {
        self.csv.is_ok() && self.json.is_ok()
    }
}

/// Writes `table` as UTF-8 CSV with a header row. Missing values are empty fields and dates
/// are `YYYY-MM-DD`.
pub fn write_csv(table: &ForecastTable, path: &Path) -> Result<(), ExportError> {
    let mut file = File::create(path).map_err(|e| ExportError::Io(path.to_path_buf(), e))?;
    // CsvWriter::finish wants a mutable frame
    let mut frame = table.frame().clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| ExportError::Csv(path.to_path_buf(), e))
}

/// Writes `table` as a pretty-printed JSON array of row objects, with ISO-8601 dates and
/// `null` for missing values.
pub fn write_json(table: &ForecastTable, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::Io(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &table.rows())
        .map_err(|e| ExportError::Json(path.to_path_buf(), e))?;
    writer
        .flush()
        .map_err(|e| ExportError::Io(path.to_path_buf(), e))
}

/// Saves `table` as `csv_file` and `json_file` inside `output_dir`, creating the directory if
/// needed. A failure on one format is logged and does not prevent writing the other.
pub fn save_output_files(
    table: &ForecastTable,
    output_dir: &Path,
    csv_file: &str,
    json_file: &str,
) -> ExportReport {
    info!(
        "Attempting to save forecast output files in: {}",
        output_dir.display()
    );
    if let Err(e) = fs::create_dir_all(output_dir) {
        error!(
            "Could not create output directory {}: {}",
            output_dir.display(),
            e
        );
        let dir = output_dir.to_path_buf();
        return ExportReport {
            csv: Err(ExportError::OutputDir(
                dir.clone(),
                std::io::Error::new(e.kind(), e.to_string()),
            )),
            json: Err(ExportError::OutputDir(dir, e)),
        };
    }

    let csv_path = output_dir.join(csv_file);
    let csv = write_csv(table, &csv_path).map(|_| csv_path.clone());
    match &csv {
        Ok(path) => info!("Forecast data successfully saved to {}", path.display()),
        Err(e) => error!("Error saving forecast data to CSV: {}", describe(e)),
    }

    let json_path = output_dir.join(json_file);
    let json = write_json(table, &json_path).map(|_| json_path.clone());
    match &json {
        Ok(path) => info!("Forecast data successfully saved to {}", path.display()),
        Err(e) => error!("Error saving forecast data to JSON: {}", describe(e)),
    }

    ExportReport { csv, json }
}

// Display for the error plus its source, which holds the useful part
fn describe(e: &ExportError) -> String {
    match std::error::Error::source(e) {
        Some(source) => format!("{}: {}", e, source),
        None => e.to_string(),
    }
}
