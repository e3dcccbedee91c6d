use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use nf_rate_converter::{ConversionState, QUICK_AMOUNTS};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct AmountBody {
    raw: String,
}

#[derive(Deserialize)]
struct PresetBody {
    value: u32,
}

async fn get_converter(State(state): State<Arc<AppState>>) -> Json<ConversionState> {
    Json(state.converter.snapshot())
}

/// Raw user input; non-digits are dropped by the converter.
async fn set_amount(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AmountBody>,
) -> Json<ConversionState> {
    state.converter.set_amount(&body.raw);
    Json(state.converter.snapshot())
}

async fn set_preset(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PresetBody>,
) -> ApiResult<Json<ConversionState>> {
    if !QUICK_AMOUNTS.contains(&body.value) {
        return Err(ApiError::BadRequest(format!(
            "Unknown preset {}, expected one of {:?}",
            body.value, QUICK_AMOUNTS
        )));
    }
    state.converter.set_amount_from_preset(body.value);
    Ok(Json(state.converter.snapshot()))
}

async fn toggle_direction(State(state): State<Arc<AppState>>) -> Json<ConversionState> {
    state.converter.toggle_direction();
    Json(state.converter.snapshot())
}

/// Fetches the rate now, outside the regular schedule.
async fn refresh_rate(State(state): State<Arc<AppState>>) -> Json<ConversionState> {
    state.converter.fetch_rate().await;
    Json(state.converter.snapshot())
}

async fn quick_amounts() -> Json<[u32; 4]> {
    Json(QUICK_AMOUNTS)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/converter", get(get_converter))
        .route("/converter/amount", put(set_amount))
        .route("/converter/preset", post(set_preset))
        .route("/converter/toggle", post(toggle_direction))
        .route("/converter/refresh", post(refresh_rate))
        .route("/converter/quick-amounts", get(quick_amounts))
}
