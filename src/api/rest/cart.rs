use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::request::{CartSummary, LogisticsRequest};
use crate::models::user::Caller;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/cart", get(get_cart))
        .route(
            "/api/cart/services/:service_id",
            post(add_to_cart).delete(remove_from_cart),
        )
}

#[derive(Deserialize)]
pub struct AddToCartParams {
    pub quantity: Option<u32>,
}

async fn get_cart(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<CartSummary>, AppError> {
    Ok(Json(state.lifecycle.cart(&caller)?))
}

async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(service_id): Path<u32>,
    Query(params): Query<AddToCartParams>,
) -> Result<Json<LogisticsRequest>, AppError> {
    let quantity = params.quantity.unwrap_or(1);
    Ok(Json(state.lifecycle.add_to_cart(&caller, service_id, quantity)?))
}

async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(service_id): Path<u32>,
) -> Result<Json<LogisticsRequest>, AppError> {
    Ok(Json(state.lifecycle.remove_from_cart(&caller, service_id)?))
}
