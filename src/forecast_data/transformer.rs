use crate::forecast_data::error::TransformError;
use crate::types::forecast_request::{ForecastRequest, TIME_KEY};
use crate::types::forecast_table::{DegradationReason, DegradedColumn, ForecastTable, DATE_COLUMN};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{Column, DataFrame};
use serde_json::{Map, Value};

const DAILY_KEY: &str = "daily";
const DAILY_UNITS_KEY: &str = "daily_units";

/// Reshapes a decoded Open-Meteo daily response into a [`ForecastTable`].
///
/// The transform does no I/O and no logging; anomalies it tolerates are reported through
/// [`ForecastTable::degraded_columns`].
#[derive(Debug, Clone)]
pub struct ForecastTransformer {
    variables: Vec<String>,
}

impl ForecastTransformer {
    /// Creates a transformer extracting `variables`, in that column order.
    pub fn new<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }

    pub fn for_request(request: &ForecastRequest) -> Self {
        Self::new(request.variables().iter().cloned())
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Builds the table for one response.
    ///
    /// Structural problems abort: a payload that isn't an object, missing or mistyped
    /// `daily`/`daily_units`, a missing or mistyped `daily.time`, an unparseable date. A single
    /// variable that is absent, not an array, or of the wrong length only degrades its own
    /// column to missing values. Values that are not numbers become missing values.
    pub fn transform(&self, raw: &Value) -> Result<ForecastTable, TransformError> {
        let payload = raw.as_object().ok_or(TransformError::UnexpectedShape {
            found: json_type_name(raw),
        })?;
        let daily = section(payload, DAILY_KEY)?;
        let units = section(payload, DAILY_UNITS_KEY)?;

        let times = match daily.get(TIME_KEY) {
            None => return Err(TransformError::MissingTime),
            Some(Value::Array(times)) => times,
            Some(other) => {
                return Err(TransformError::InvalidTime {
                    found: json_type_name(other),
                })
            }
        };
        let row_count = times.len();

        let mut columns = Vec::with_capacity(self.variables.len() + 1);
        let mut degraded = Vec::new();

        for variable in &self.variables {
            let name = display_name(variable, units);
            let values = match daily.get(variable) {
                None => Err(DegradationReason::Missing),
                Some(Value::Array(values)) if values.len() == row_count => {
                    Ok(values.iter().map(coerce_numeric).collect::<Vec<_>>())
                }
                Some(Value::Array(values)) => Err(DegradationReason::LengthMismatch {
                    expected: row_count,
                    found: values.len(),
                }),
                Some(_) => Err(DegradationReason::NotASequence),
            };
            let values = values.unwrap_or_else(|reason| {
                degraded.push(DegradedColumn {
                    variable: variable.clone(),
                    column: name.clone(),
                    reason,
                });
                vec![None; row_count]
            });
            columns.push(Column::new(name.into(), values));
        }

        let dates = times
            .iter()
            .enumerate()
            .map(|(index, value)| {
                parse_date(value).ok_or_else(|| TransformError::DateParse {
                    index,
                    value: value
                        .as_str()
                        .map(str::to_owned)
                        .unwrap_or_else(|| value.to_string()),
                })
            })
            .collect::<Result<Vec<NaiveDate>, _>>()?;
        columns.insert(0, Column::new(DATE_COLUMN.into(), dates));

        let frame = DataFrame::new(columns).map_err(TransformError::TableConstruction)?;
        Ok(ForecastTable::new(frame, degraded))
    }
}

/// Names the JSON type of a value, for diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn section<'a>(
    payload: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a Map<String, Value>, TransformError> {
    match payload.get(key) {
        None => Err(TransformError::MissingKey(key)),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(TransformError::InvalidSection {
            key,
            found: json_type_name(other),
        }),
    }
}

/// `"<variable> (<unit>)"`, or the bare variable when the response has no usable unit.
fn display_name(variable: &str, units: &Map<String, Value>) -> String {
    match units.get(variable).and_then(Value::as_str) {
        Some(unit) if !unit.is_empty() => format!("{} ({})", variable, unit),
        _ => variable.to_owned(),
    }
}

fn coerce_numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Accepts `YYYY-MM-DD`, or an ISO timestamp truncated to its date.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
                .ok()
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|datetime| datetime.date())
        })
}
