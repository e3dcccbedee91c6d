use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn healthz() -> &'static str {
    "ok"
}

/// Ready once the refresh schedule is running.
async fn readyz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    if state.converter.is_disposed() || !state.converter.is_running() {
        return Err(ApiError::Unavailable("Converter not running".to_string()));
    }
    Ok("ok")
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
