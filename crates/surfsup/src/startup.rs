use crate::{
    db::{ClimateAccess, ClimateData},
    index_handler, precipitation, routes, stations, temperatures_between, temperatures_from, tobs,
    Climate,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::{info, warn};
use std::{sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate: Arc<Climate>,
}

impl AppState {
    pub fn new(data: Arc<dyn ClimateData>) -> Self {
        Self {
            climate: Arc::new(Climate::new(data)),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperatures_from,
        routes::climate::climate_routes::temperatures_between,
    ),
    tags(
        (name = "surfs up climate api", description = "a read-only RESTful api over Honolulu precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Opens the shared pool. The caller keeps a handle so it can close the pool on shutdown.
pub async fn build_climate_db(
    database: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<Arc<ClimateAccess>, anyhow::Error> {
    let climate_db = ClimateAccess::new(database, max_connections, acquire_timeout)
        .map_err(|e| anyhow!("error setting up climate database: {}", e))?;

    // Requests still report their own errors if the file is unusable
    match climate_db.health_check().await {
        Ok(()) => info!("Climate database ready at: {}", database),
        Err(e) => warn!("Climate database health check failed: {}", e),
    }

    Ok(Arc::new(climate_db))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperatures_from))
        .route("/api/v1.0/{start}/{end}", get(temperatures_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, path: {}, time: {}", response.status().as_str(), path, response_time);

    response
}
