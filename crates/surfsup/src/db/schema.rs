//! Hand-authored mapping of the tables in the climate data file.
//!
//! The file is produced elsewhere; these names mirror its layout and are never
//! discovered at runtime.

use sqlx::FromRow;

pub const MEASUREMENT_TABLE: &str = "measurement";
pub const STATION_TABLE: &str = "station";

/// Storage order for both tables.
pub const ROW_ID: &str = "id";
pub const STATION_ID: &str = "station";
pub const DATE: &str = "date";
pub const PRECIPITATION: &str = "prcp";
pub const TEMPERATURE: &str = "tobs";

/// Alias every numeric reading is selected under, see [`DailyReading`].
pub const READING: &str = "reading";

pub const STATION_COLUMNS: (&str, &str) = (ROW_ID, STATION_ID);

/// One measurement column on one day, as `(date, CAST(column AS REAL))`.
///
/// Numeric columns may hold INTEGER or REAL storage classes row by row, so
/// readings are always cast before decoding.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DailyReading {
    /// `YYYY-MM-DD`, compared as text
    pub date: String,
    pub reading: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Station {
    pub id: i64,
    /// Passed through as stored, NULL included
    pub station: Option<String>,
}

/// Max/min/avg of temperature observations over a date range.
///
/// All three are `None` when no non-null observation matched.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct TemperatureSummary {
    pub tmax: Option<f64>,
    pub tmin: Option<f64>,
    pub tavg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DateBounds {
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}
