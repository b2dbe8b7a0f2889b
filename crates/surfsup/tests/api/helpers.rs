use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    Router,
};
use hyper::{header, Method, StatusCode};
use mockall::mock;
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    Connection, SqliteConnection,
};
use std::{sync::Arc, time::Duration};
use surfsup::{
    app, AppState, ClimateAccess, ClimateData, ClimateSession, DailyReading, DateBounds, Error,
    Station, StationActivity, TemperatureSummary,
};
use tempfile::TempDir;
use tower::ServiceExt;

mock! {
    pub ClimateAccess {}
    #[async_trait]
    impl ClimateData for ClimateAccess {
        async fn open_session(&self) -> Result<Box<dyn ClimateSession>, Error>;
    }
}

mock! {
    pub Session {}
    #[async_trait]
    impl ClimateSession for Session {
        async fn date_bounds(&mut self) -> Result<DateBounds, Error>;
        async fn stations(&mut self) -> Result<Vec<Station>, Error>;
        async fn precipitation_since(&mut self, floor: &str) -> Result<Vec<DailyReading>, Error>;
        async fn most_active_station(&mut self) -> Result<Option<StationActivity>, Error>;
        async fn station_temperatures_since(
            &mut self,
            station: &str,
            floor: &str,
        ) -> Result<Vec<DailyReading>, Error>;
        async fn temperature_summary(
            &mut self,
            start: &str,
            end: &str,
        ) -> Result<TemperatureSummary, Error>;
        async fn close(&mut self);
    }
}

pub const SCHEMA: &str = r#"
CREATE TABLE station (
    id INTEGER PRIMARY KEY,
    station TEXT,
    name TEXT,
    latitude FLOAT,
    longitude FLOAT,
    elevation FLOAT
);
CREATE TABLE measurement (
    id INTEGER PRIMARY KEY,
    station TEXT,
    date TEXT,
    prcp FLOAT,
    tobs FLOAT
);
"#;

pub struct TestApp {
    pub app: Router,
    // Keeps the fixture file alive for the life of the test
    _data_dir: Option<TempDir>,
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    pub async fn get_json(&self, uri: &str) -> Value {
        let (status, body) = self.get(uri).await;
        assert_eq!(status, StatusCode::OK, "unexpected status for {}", uri);
        serde_json::from_str(&body).expect("response body is not JSON")
    }
}

/// Builds the app on top of any data source, usually a mock.
pub fn spawn_app(climate_data: Arc<dyn ClimateData>) -> TestApp {
    TestApp {
        app: app(AppState::new(climate_data)),
        _data_dir: None,
    }
}

/// Writes a SQLite file holding `schema` plus `inserts` into a fresh temp dir.
pub async fn fixture_database(schema: &str, inserts: &str) -> (TempDir, String) {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = data_dir.path().join("hawaii.sqlite");

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("Failed to create fixture database");
    sqlx::raw_sql(schema).execute(&mut conn).await.unwrap();
    if !inserts.trim().is_empty() {
        sqlx::raw_sql(inserts).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();

    let path = path.to_str().unwrap().to_string();
    (data_dir, path)
}

/// Builds the app on a real SQLite file holding the fixture schema plus `inserts`.
pub async fn spawn_fixture_app(inserts: &str) -> TestApp {
    spawn_fixture_app_with_schema(SCHEMA, inserts).await
}

pub async fn spawn_fixture_app_with_schema(schema: &str, inserts: &str) -> TestApp {
    let (data_dir, path) = fixture_database(schema, inserts).await;
    let climate_db = ClimateAccess::new(&path, 2, Duration::from_secs(5)).unwrap();

    TestApp {
        app: app(AppState::new(Arc::new(climate_db))),
        _data_dir: Some(data_dir),
    }
}

/// Builds the app on a data file path that does not exist.
pub fn spawn_missing_file_app() -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = data_dir.path().join("missing").join("hawaii.sqlite");
    let climate_db =
        ClimateAccess::new(path.to_str().unwrap(), 1, Duration::from_secs(2)).unwrap();

    TestApp {
        app: app(AppState::new(Arc::new(climate_db))),
        _data_dir: Some(data_dir),
    }
}

/// A data source handing out exactly one session that must be closed exactly once.
pub fn single_session(mut session: MockSession) -> MockClimateAccess {
    session.expect_close().times(1).return_const(());

    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_open_session()
        .times(1)
        .return_once(move || Ok(Box::new(session) as Box<dyn ClimateSession>));
    climate_data
}

pub fn store_failure() -> Error {
    Error::Query(sqlx::Error::PoolTimedOut)
}

pub const ALL_ROUTES: &[&str] = &[
    "/",
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/2017-01-01",
    "/api/v1.0/2017-01-01/2017-06-30",
];
