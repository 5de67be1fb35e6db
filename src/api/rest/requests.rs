use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::request::{
    DraftUpdate, FormInput, LineUpdate, LogisticsRequest, Outcome, RequestDetail,
    RequestFilter, RequestStatus,
};
use crate::models::user::Caller;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/logistic-requests", get(list_requests))
        .route(
            "/api/logistic-requests/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
        .route("/api/logistic-requests/:id/form", put(form_request))
        .route("/api/logistic-requests/:id/complete", put(complete_request))
        .route(
            "/api/logistic-requests/:id/services/:service_id",
            put(update_line).delete(remove_line),
        )
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct CompleteRequest {
    pub status: String,
}

async fn list_requests(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<LogisticsRequest>>, AppError> {
    let status = params
        .status
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(str::parse::<RequestStatus>)
        .transpose()?;

    let filter = RequestFilter {
        status,
        creator_id: None,
        date_from: params.date_from,
        date_to: params.date_to,
    };

    Ok(Json(state.lifecycle.list(&caller, filter)?))
}

async fn get_request(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestDetail>, AppError> {
    Ok(Json(state.lifecycle.get(&caller, id)?))
}

async fn update_request(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<DraftUpdate>,
) -> Result<Json<LogisticsRequest>, AppError> {
    Ok(Json(state.lifecycle.update_draft(&caller, id, &payload)?))
}

async fn delete_request(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<LogisticsRequest>, AppError> {
    Ok(Json(state.lifecycle.delete(&caller, id)?))
}

async fn form_request(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<FormInput>,
) -> Result<Json<LogisticsRequest>, AppError> {
    Ok(Json(state.lifecycle.form(&caller, id, &payload)?))
}

async fn complete_request(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<LogisticsRequest>, AppError> {
    let outcome = payload.status.parse::<Outcome>()?;
    Ok(Json(state.lifecycle.complete(&caller, id, outcome)?))
}

async fn update_line(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path((id, service_id)): Path<(Uuid, u32)>,
    Json(payload): Json<LineUpdate>,
) -> Result<Json<LogisticsRequest>, AppError> {
    Ok(Json(
        state.lifecycle.update_line(&caller, id, service_id, &payload)?,
    ))
}

async fn remove_line(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path((id, service_id)): Path<(Uuid, u32)>,
) -> Result<Json<LogisticsRequest>, AppError> {
    Ok(Json(state.lifecycle.remove_line(&caller, id, service_id)?))
}
