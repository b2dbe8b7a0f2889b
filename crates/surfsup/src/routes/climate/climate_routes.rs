use axum::extract::{Path, State};
use std::sync::Arc;

use crate::{AppState, DatedValue, PrecipitationByDate, Reply, TemperatureReport};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation keyed by date for the last year of data, or {\"error\": ...}"),
    ))]
pub async fn precipitation(State(state): State<Arc<AppState>>) -> Reply<PrecipitationByDate> {
    state.climate.precipitation_last_year().await.into()
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Station ids in storage order, or {\"error\": ...}"),
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Reply<Vec<Option<String>>> {
    state.climate.list_stations().await.into()
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "List of {date: temperature} objects for the most active station over the last year of data, or {\"error\": ...}"),
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Reply<Vec<DatedValue>> {
    state.climate.most_active_station_tobs_last_year().await.into()
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Max, min and average temperature from start through the latest observation, or {\"error\": ...}"),
    ))]
pub async fn temperatures_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Reply<TemperatureReport> {
    state.climate.aggregate_from_start(&start).await.into()
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Max, min and average temperature between start and end inclusive, or {\"error\": ...}"),
    ))]
pub async fn temperatures_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Reply<TemperatureReport> {
    state.climate.aggregate_between(&start, &end).await.into()
}
