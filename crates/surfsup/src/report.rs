//! JSON shapes returned by the API.
//!
//! Key names are fixed and human readable; numbers and nulls pass through
//! untouched.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::{db, DailyReading, TemperatureSummary};

/// Precipitation keyed by date, one value per date.
///
/// When several rows share a date the last one inserted wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PrecipitationByDate(pub BTreeMap<String, Option<f64>>);

impl PrecipitationByDate {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, date: &str) -> Option<Option<f64>> {
        self.0.get(date).copied()
    }
}

impl FromIterator<DailyReading> for PrecipitationByDate {
    fn from_iter<I: IntoIterator<Item = DailyReading>>(rows: I) -> Self {
        let mut by_date = BTreeMap::new();
        for row in rows {
            by_date.insert(row.date, row.reading);
        }
        Self(by_date)
    }
}

/// A single `{date: value}` object.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedValue {
    pub date: String,
    pub value: Option<f64>,
}

impl Serialize for DatedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.value)?;
        map.end()
    }
}

impl From<DailyReading> for DatedValue {
    fn from(row: DailyReading) -> Self {
        Self {
            date: row.date,
            value: row.reading,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemperatureStats {
    #[serde(rename = "Maximum Temperature:")]
    pub max: Option<f64>,
    #[serde(rename = "Minimum Temperature:")]
    pub min: Option<f64>,
    #[serde(rename = "Average Temperature:")]
    pub avg: Option<f64>,
}

impl From<TemperatureSummary> for TemperatureStats {
    fn from(summary: TemperatureSummary) -> Self {
        Self {
            max: summary.tmax,
            min: summary.tmin,
            avg: summary.tavg,
        }
    }
}

/// Temperature stats wrapped under a header naming the range they cover.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReport {
    pub start: String,
    /// `None` only when the dataset has no measurements at all
    pub end: Option<String>,
    pub stats: TemperatureStats,
}

impl TemperatureReport {
    pub fn header(&self) -> String {
        format!(
            "Starting on {}, and ending on {}:",
            self.start,
            self.end.as_deref().unwrap_or("null")
        )
    }
}

impl Serialize for TemperatureReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.header(), &self.stats)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Either the payload or `{"error": ...}`. Both are sent with 200 OK.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Data(T),
    Failure(ErrorBody),
}

impl<T> Reply<T> {
    pub fn failure(err: db::Error) -> Self {
        error!("request failed: {}", err);
        Reply::Failure(ErrorBody {
            error: err.to_string(),
        })
    }
}

impl<T> From<Result<T, db::Error>> for Reply<T> {
    fn from(result: Result<T, db::Error>) -> Self {
        match result {
            Ok(data) => Reply::Data(data),
            Err(err) => Reply::failure(err),
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
