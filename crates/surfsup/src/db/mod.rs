mod climate_data;
pub mod schema;
pub mod window;

pub use climate_data::*;
pub use schema::{DailyReading, DateBounds, Station, StationActivity, TemperatureSummary};
pub use window::{one_year_before, one_year_window, DateWindow};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query climate database: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored date is not a valid YYYY-MM-DD date: {0}")]
    InvalidDate(String),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Failed to build query: {0}")]
    QueryBuild(#[from] regex::Error),
    #[error("Database integrity check failed: {0}")]
    Integrity(String),
    #[error("Session used after it was released")]
    SessionClosed,
}
