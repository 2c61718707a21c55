//! Contains the `ForecastTable` structure, the tabular result of transforming a forecast response.

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, DataType};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Name of the first column of every table.
pub const DATE_COLUMN: &str = "date";

/// Days between 0001-01-01 (CE) and 1970-01-01, the epoch polars stores dates against.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One forecast day keyed by column name: `date` as `YYYY-MM-DD`, numbers, or `null`.
pub type ForecastRow = Map<String, Value>;

/// Why a requested variable's column holds only missing values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradationReason {
    /// The variable was not present under `daily`.
    Missing,
    /// The variable was present but not an array.
    NotASequence,
    /// The variable's array length differed from the `time` array.
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradationReason::Missing => write!(f, "not found in response"),
            DegradationReason::NotASequence => write!(f, "not an array"),
            DegradationReason::LengthMismatch { expected, found } => {
                write!(f, "length {} does not match {} dates", found, expected)
            }
        }
    }
}

/// A variable whose column was filled with missing values instead of response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedColumn {
    /// The variable name as requested from the API.
    pub variable: String,
    /// The column name it was given in the table.
    pub column: String,
    pub reason: DegradationReason,
}

/// A daily forecast reshaped into a table: one row per forecast day, in the order returned
/// by the API.
///
/// The first column is always [`DATE_COLUMN`] (polars `Date`); every other column is a nullable
/// `Float64` named `"<variable> (<unit>)"`, or the bare variable name when the response had no
/// unit for it. Missing values are nulls, which are distinct from a present `0.0`.
///
/// Tables are produced by [`crate::ForecastTransformer::transform`] and are never mutated
/// afterwards.
///
/// # Examples
///
/// ```
/// use daily_forecast::ForecastTransformer;
/// use serde_json::json;
///
/// let transformer = ForecastTransformer::new(["temperature_2m_mean"]);
/// let raw = json!({
///     "daily": { "time": ["2024-01-01"], "temperature_2m_mean": [1.5] },
///     "daily_units": { "temperature_2m_mean": "°C" }
/// });
///
/// let table = transformer.transform(&raw)?;
/// let row = table.first_row().expect("one row");
/// assert_eq!(row["date"], json!("2024-01-01"));
/// assert_eq!(row["temperature_2m_mean (°C)"], json!(1.5));
/// # Ok::<(), daily_forecast::TransformError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ForecastTable {
    frame: DataFrame,
    degraded: Vec<DegradedColumn>,
}

impl ForecastTable {
    pub(crate) fn new(frame: DataFrame, degraded: Vec<DegradedColumn>) -> Self {
        Self { frame, degraded }
    }

    /// The underlying polars `DataFrame`.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of forecast days.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Column names in table order, starting with `date`.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Columns that were filled with missing values, and why.
    pub fn degraded_columns(&self) -> &[DegradedColumn] {
        &self.degraded
    }

    /// The forecast dates, one per row.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.frame
            .column(DATE_COLUMN)
            .ok()
            .and_then(|column| column.date().ok())
            .map(|dates| {
                dates
                    .into_iter()
                    .filter_map(|days| days.and_then(days_to_date))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The values of a numeric column, `None` where the value is missing.
    ///
    /// Returns `None` if the table has no numeric column with that name.
    pub fn values(&self, column: &str) -> Option<Vec<Option<f64>>> {
        let values = self.frame.column(column).ok()?.f64().ok()?;
        Some(values.into_iter().collect())
    }

    /// The row at `index` as a flat JSON object, or `None` past the last row.
    pub fn row(&self, index: usize) -> Option<ForecastRow> {
        if index >= self.height() {
            return None;
        }
        let row = self
            .frame
            .get_columns()
            .iter()
            .map(|column| (column.name().to_string(), cell_value(column, index)))
            .collect();
        Some(row)
    }

    /// The first (current) forecast day.
    pub fn first_row(&self) -> Option<ForecastRow> {
        self.row(0)
    }

    /// Every row, in table order.
    pub fn rows(&self) -> Vec<ForecastRow> {
        (0..self.height()).filter_map(|index| self.row(index)).collect()
    }
}

impl fmt::Display for ForecastTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

fn days_to_date(days: i32) -> Option<NaiveDate> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

fn cell_value(column: &Column, index: usize) -> Value {
    let value = match column.dtype() {
        DataType::Date => column
            .date()
            .ok()
            .and_then(|dates| dates.get(index))
            .and_then(days_to_date)
            .map(|date| Value::String(date.format("%Y-%m-%d").to_string())),
        _ => column
            .f64()
            .ok()
            .and_then(|values| values.get(index))
            .and_then(Number::from_f64)
            .map(Value::Number),
    };
    value.unwrap_or(Value::Null)
}
