use log::{debug, info};
use std::sync::Arc;

use crate::{
    db::{one_year_window, with_session, ClimateData, ClimateSession, Error, TemperatureSummary},
    DatedValue, PrecipitationByDate, TemperatureReport,
};

/// First and last observation dates of the whole dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRange {
    pub first: String,
    pub last: String,
}

/// Read operations behind the API. Each call runs in its own session.
pub struct Climate {
    data: Arc<dyn ClimateData>,
}

impl Climate {
    pub fn new(data: Arc<dyn ClimateData>) -> Self {
        Self { data }
    }

    /// `None` when there are no measurements.
    pub async fn dataset_range(&self) -> Result<Option<DatasetRange>, Error> {
        with_session(self.data.as_ref(), |session| Box::pin(dataset_range(session))).await
    }

    /// Station ids in storage order. NULL ids come back as `None`.
    pub async fn list_stations(&self) -> Result<Vec<Option<String>>, Error> {
        with_session(self.data.as_ref(), |session| Box::pin(station_ids(session))).await
    }

    pub async fn precipitation_last_year(&self) -> Result<PrecipitationByDate, Error> {
        with_session(self.data.as_ref(), |session| {
            Box::pin(precipitation_last_year(session))
        })
        .await
    }

    pub async fn most_active_station_tobs_last_year(&self) -> Result<Vec<DatedValue>, Error> {
        with_session(self.data.as_ref(), |session| {
            Box::pin(most_active_station_tobs(session))
        })
        .await
    }

    /// Stats from `start` through the latest stored date. `start` is not validated.
    pub async fn aggregate_from_start(&self, start: &str) -> Result<TemperatureReport, Error> {
        let start = start.to_owned();
        with_session(self.data.as_ref(), move |session| {
            Box::pin(temperatures_from(session, start))
        })
        .await
    }

    /// Stats over `start <= date <= end`. A reversed range matches nothing and yields nulls.
    pub async fn aggregate_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureReport, Error> {
        let (start, end) = (start.to_owned(), end.to_owned());
        with_session(self.data.as_ref(), move |session| {
            Box::pin(temperatures_between(session, start, end))
        })
        .await
    }
}

async fn dataset_range(session: &mut dyn ClimateSession) -> Result<Option<DatasetRange>, Error> {
    let bounds = session.date_bounds().await?;
    Ok(match (bounds.first_date, bounds.last_date) {
        (Some(first), Some(last)) => Some(DatasetRange { first, last }),
        _ => None,
    })
}

async fn station_ids(session: &mut dyn ClimateSession) -> Result<Vec<Option<String>>, Error> {
    let stations = session.stations().await?;
    Ok(stations.into_iter().map(|s| s.station).collect())
}

async fn precipitation_last_year(
    session: &mut dyn ClimateSession,
) -> Result<PrecipitationByDate, Error> {
    let Some(window) = one_year_window(session).await? else {
        return Ok(PrecipitationByDate::default());
    };
    debug!("precipitation window: {} to {}", window.floor, window.ceiling);

    let rows = session.precipitation_since(&window.floor).await?;
    Ok(rows.into_iter().collect())
}

async fn most_active_station_tobs(
    session: &mut dyn ClimateSession,
) -> Result<Vec<DatedValue>, Error> {
    let Some(active) = session.most_active_station().await? else {
        return Ok(vec![]);
    };
    let Some(window) = one_year_window(session).await? else {
        return Ok(vec![]);
    };
    info!(
        "most active station: {} ({} observations), window: {} to {}",
        active.station, active.observations, window.floor, window.ceiling
    );

    let rows = session
        .station_temperatures_since(&active.station, &window.floor)
        .await?;
    Ok(rows.into_iter().map(DatedValue::from).collect())
}

async fn temperatures_from(
    session: &mut dyn ClimateSession,
    start: String,
) -> Result<TemperatureReport, Error> {
    let end = session.date_bounds().await?.last_date;
    let summary = match &end {
        Some(end) => session.temperature_summary(&start, end).await?,
        None => TemperatureSummary::default(),
    };

    Ok(TemperatureReport {
        start,
        end,
        stats: summary.into(),
    })
}

async fn temperatures_between(
    session: &mut dyn ClimateSession,
    start: String,
    end: String,
) -> Result<TemperatureReport, Error> {
    let summary = session.temperature_summary(&start, &end).await?;
    Ok(TemperatureReport {
        start,
        end: Some(end),
        stats: summary.into(),
    })
}
