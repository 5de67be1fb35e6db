use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::engine::calculator::{estimate_delivery, validate_cargo, Estimate};
use crate::error::AppError;
use crate::models::cargo::Cargo;
use crate::state::AppState;
use crate::storage::LogisticsStore;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/estimate", post(estimate))
}

#[derive(Deserialize)]
pub struct EstimateRequest {
    pub service_id: u32,
    pub from_city: String,
    pub to_city: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

async fn estimate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EstimateRequest>,
) -> Result<Json<Estimate>, AppError> {
    if payload.from_city.trim().is_empty() || payload.to_city.trim().is_empty() {
        return Err(AppError::Validation(
            "from_city and to_city are required".to_string(),
        ));
    }

    let cargo = Cargo::new(payload.length, payload.width, payload.height, payload.weight);
    validate_cargo(&cargo)?;

    let service = state.store.service(payload.service_id)?;

    let start = Instant::now();
    let estimate = estimate_delivery(&service, &payload.from_city, &payload.to_city, &cargo);
    state
        .metrics
        .observe_estimate(estimate.valid, start.elapsed().as_secs_f64());

    Ok(Json(estimate.into_result()?))
}
