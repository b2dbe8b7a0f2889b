use async_trait::async_trait;
use futures::future::BoxFuture;
use log::{debug, trace};
use regex::Regex;
use scooby::postgres::{select, Aliasable, Orderable, Parameters, Select};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite, SqliteConnection,
};
use std::time::Duration;

use super::{
    schema::{
        DATE, MEASUREMENT_TABLE, PRECIPITATION, READING, ROW_ID, STATION_COLUMNS, STATION_ID,
        STATION_TABLE, TEMPERATURE,
    },
    DailyReading, DateBounds, Error, Station, StationActivity, TemperatureSummary,
};

/// Source of request-scoped sessions on the climate store.
#[async_trait]
pub trait ClimateData: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn ClimateSession>, Error>;
}

/// One connection's worth of read access. Every query compares `date` as text.
#[async_trait]
pub trait ClimateSession: Send {
    /// Lexical min and max of `measurement.date`, both `None` on an empty table
    async fn date_bounds(&mut self) -> Result<DateBounds, Error>;
    /// All stations in storage order, duplicates included
    async fn stations(&mut self) -> Result<Vec<Station>, Error>;
    /// `prcp` of every measurement with `date >= floor`, in storage order
    async fn precipitation_since(&mut self, floor: &str) -> Result<Vec<DailyReading>, Error>;
    /// Station with the most measurements, ties going to the lowest station id
    async fn most_active_station(&mut self) -> Result<Option<StationActivity>, Error>;
    /// `tobs` of one station's measurements with `date >= floor`, in storage order
    async fn station_temperatures_since(
        &mut self,
        station: &str,
        floor: &str,
    ) -> Result<Vec<DailyReading>, Error>;
    /// Max/min/avg of non-null `tobs` over `start <= date <= end`
    async fn temperature_summary(
        &mut self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, Error>;
    /// Hands the connection back. Later queries fail with [`Error::SessionClosed`].
    async fn close(&mut self);
}

/// Runs `op` inside a fresh session and releases the session exactly once,
/// whether `op` succeeds or fails.
pub async fn with_session<T, F>(data: &dyn ClimateData, op: F) -> Result<T, Error>
where
    T: Send,
    F: for<'s> FnOnce(&'s mut dyn ClimateSession) -> BoxFuture<'s, Result<T, Error>> + Send,
{
    let mut session = data.open_session().await?;
    let result = op(session.as_mut()).await;
    session.close().await;
    result
}

/// Numeric columns are decoded as REAL whatever storage class a row uses.
fn real(expr: impl std::fmt::Display) -> String {
    format!("CAST({expr} AS REAL)")
}

pub struct ClimateAccess {
    pool: SqlitePool,
    placeholder: Regex,
}

impl ClimateAccess {
    /// Opens a lazy, read-only pool on the data file at `path`.
    ///
    /// Nothing touches the file until the first session is opened, so a
    /// missing file shows up as a per-request error instead of a startup failure.
    pub fn new(path: &str, max_connections: u32, acquire_timeout: Duration) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            placeholder: Regex::new(r"\$(\d+)")?,
        })
    }

    /// Check database connectivity and integrity.
    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;

        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await?;
        if result != "ok" {
            return Err(Error::Integrity(result));
        }

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn open_session(&self) -> Result<Box<dyn ClimateSession>, Error> {
        let conn = self.pool.acquire().await?;
        trace!("session opened, idle connections: {}", self.pool.num_idle());
        Ok(Box::new(SqliteSession {
            conn: Some(conn),
            placeholder: self.placeholder.clone(),
        }))
    }
}

pub struct SqliteSession {
    conn: Option<PoolConnection<Sqlite>>,
    placeholder: Regex,
}

impl SqliteSession {
    fn connection(&mut self) -> Result<&mut SqliteConnection, Error> {
        self.conn.as_deref_mut().ok_or(Error::SessionClosed)
    }

    /// scooby emits postgres-style `$n` placeholders, sqlite wants `?n`
    fn sql(&self, query: Select) -> String {
        let sql = self
            .placeholder
            .replace_all(&query.to_string(), "?${1}")
            .into_owned();
        debug!("query: {}", sql);
        sql
    }
}

#[async_trait]
impl ClimateSession for SqliteSession {
    async fn date_bounds(&mut self) -> Result<DateBounds, Error> {
        let sql = self.sql(
            select((
                format!("MIN({DATE})").as_("first_date"),
                format!("MAX({DATE})").as_("last_date"),
            ))
            .from(MEASUREMENT_TABLE),
        );

        let bounds = sqlx::query_as::<_, DateBounds>(&sql)
            .fetch_one(self.connection()?)
            .await?;
        Ok(bounds)
    }

    async fn stations(&mut self) -> Result<Vec<Station>, Error> {
        let sql = self.sql(
            select(STATION_COLUMNS)
                .from(STATION_TABLE)
                .order_by(ROW_ID.asc()),
        );

        let stations = sqlx::query_as::<_, Station>(&sql)
            .fetch_all(self.connection()?)
            .await?;
        Ok(stations)
    }

    async fn precipitation_since(&mut self, floor: &str) -> Result<Vec<DailyReading>, Error> {
        let mut placeholders = Parameters::new();
        let sql = self.sql(
            select((DATE, real(PRECIPITATION).as_(READING)))
                .from(MEASUREMENT_TABLE)
                .where_(format!("{DATE} >= {}", placeholders.next()))
                .order_by(ROW_ID.asc()),
        );

        let rows = sqlx::query_as::<_, DailyReading>(&sql)
            .bind(floor)
            .fetch_all(self.connection()?)
            .await?;
        Ok(rows)
    }

    async fn most_active_station(&mut self) -> Result<Option<StationActivity>, Error> {
        let sql = self.sql(
            select((
                STATION_ID,
                format!("COUNT({STATION_ID})").as_("observations"),
            ))
            .from(MEASUREMENT_TABLE)
            .where_(format!("{STATION_ID} IS NOT NULL"))
            .group_by(STATION_ID)
            .order_by(("observations".desc(), STATION_ID.asc()))
            .limit(1),
        );

        let active = sqlx::query_as::<_, StationActivity>(&sql)
            .fetch_optional(self.connection()?)
            .await?;
        Ok(active)
    }

    async fn station_temperatures_since(
        &mut self,
        station: &str,
        floor: &str,
    ) -> Result<Vec<DailyReading>, Error> {
        let mut placeholders = Parameters::new();
        let sql = self.sql(
            select((DATE, real(TEMPERATURE).as_(READING)))
                .from(MEASUREMENT_TABLE)
                .where_(format!("{STATION_ID} = {}", placeholders.next()))
                .where_(format!("{DATE} >= {}", placeholders.next()))
                .order_by(ROW_ID.asc()),
        );

        let rows = sqlx::query_as::<_, DailyReading>(&sql)
            .bind(station)
            .bind(floor)
            .fetch_all(self.connection()?)
            .await?;
        Ok(rows)
    }

    async fn temperature_summary(
        &mut self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, Error> {
        let mut placeholders = Parameters::new();
        let sql = self.sql(
            select((
                real(format!("MAX({TEMPERATURE})")).as_("tmax"),
                real(format!("MIN({TEMPERATURE})")).as_("tmin"),
                real(format!("AVG({TEMPERATURE})")).as_("tavg"),
            ))
            .from(MEASUREMENT_TABLE)
            .where_(format!("{TEMPERATURE} IS NOT NULL"))
            .where_(format!("{DATE} >= {}", placeholders.next()))
            .where_(format!("{DATE} <= {}", placeholders.next())),
        );

        let summary = sqlx::query_as::<_, TemperatureSummary>(&sql)
            .bind(start)
            .bind(end)
            .fetch_one(self.connection()?)
            .await?;
        Ok(summary)
    }

    async fn close(&mut self) {
        if self.conn.take().is_some() {
            trace!("session released");
        }
    }
}
