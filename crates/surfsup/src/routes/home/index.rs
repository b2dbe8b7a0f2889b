use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use crate::{templates::home_page, AppState, Reply};

/// Handler for the landing page (GET /)
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.climate.dataset_range().await {
        Ok(range) => Html(home_page(range.as_ref()).into_string()).into_response(),
        Err(err) => Reply::<()>::failure(err).into_response(),
    }
}
