//! Shared helpers for CLI commands.

use chrono::NaiveDate;
use serde_json::Value;

use pollen_common::error::{PollenError, PollenResult};
use pollen_common::types::PlotlySeries;
use pollen_types::output::{PointRow, SeriesOutput};

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> PollenResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PollenError::InvalidInput(format!("Invalid date: {s}. Use YYYY-MM-DD")))
}

/// Genus names out of a `/genera` body.
///
/// Accepts a list of names or an object keyed by genus.
pub fn genera_names(body: &Value) -> Vec<String> {
    match body {
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

pub fn series_output(genus: &str, series: Option<PlotlySeries>) -> SeriesOutput {
    let points = series
        .as_ref()
        .map(|s| {
            s.points()
                .map(|(date, value)| PointRow {
                    date: date.to_string(),
                    value,
                })
                .collect()
        })
        .unwrap_or_default();

    SeriesOutput {
        genus: genus.to_string(),
        found: series.is_some(),
        points,
    }
}
