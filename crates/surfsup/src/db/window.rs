use time::{macros::format_description, Date};

use super::{ClimateSession, Error};

/// Inclusive `[floor, ceiling]` range covering the last year of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub floor: String,
    pub ceiling: String,
}

impl DateWindow {
    /// Window ending on `ceiling` and starting exactly one calendar year before it.
    pub fn ending_on(ceiling: &str) -> Result<Self, Error> {
        let ceiling = parse_date(ceiling)?;
        let floor = one_year_before(ceiling)?;

        Ok(Self {
            floor: format_date(floor)?,
            ceiling: format_date(ceiling)?,
        })
    }
}

/// Resolves the one-year window from the latest stored date.
///
/// `None` means the measurement table is empty.
pub async fn one_year_window(
    session: &mut dyn ClimateSession,
) -> Result<Option<DateWindow>, Error> {
    match session.date_bounds().await?.last_date {
        Some(ceiling) => Ok(Some(DateWindow::ending_on(&ceiling)?)),
        None => Ok(None),
    }
}

/// Same month and day in the prior year; 29 February becomes 28 February.
pub fn one_year_before(date: Date) -> Result<Date, Error> {
    let year = date.year() - 1;
    Date::from_calendar_date(year, date.month(), date.day())
        .or_else(|_| Date::from_calendar_date(year, date.month(), date.day().saturating_sub(1)))
        .map_err(|e| Error::InvalidDate(format!("{}: {}", date, e)))
}

fn parse_date(value: &str) -> Result<Date, Error> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| Error::InvalidDate(format!("{}: {}", value, e)))
}

fn format_date(date: Date) -> Result<String, Error> {
    Ok(date.format(format_description!("[year]-[month]-[day]"))?)
}
