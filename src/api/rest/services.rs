use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;
use tracing::info;

use crate::error::AppError;
use crate::models::service::{ServiceFilter, ServiceOffering, ServiceSpec};
use crate::models::user::Caller;
use crate::state::AppState;
use crate::storage::LogisticsStore;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/services", get(list_services).post(create_service))
        .route(
            "/api/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

fn validate(spec: &ServiceSpec) -> Result<(), AppError> {
    let problems = spec.problems();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join("; ")))
    }
}

async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ServiceFilter>,
) -> Result<Json<Vec<ServiceOffering>>, AppError> {
    Ok(Json(state.store.services(&filter)?))
}

async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<ServiceOffering>, AppError> {
    Ok(Json(state.store.service(id)?))
}

async fn create_service(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<ServiceSpec>,
) -> Result<(StatusCode, Json<ServiceOffering>), AppError> {
    caller.require_admin()?;
    validate(&payload)?;

    let service = state.store.insert_service(payload)?;
    info!(service_id = service.id, name = %service.name, "service offering created");
    Ok((StatusCode::CREATED, Json(service)))
}

async fn update_service(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<u32>,
    Json(payload): Json<ServiceSpec>,
) -> Result<Json<ServiceOffering>, AppError> {
    caller.require_admin()?;
    validate(&payload)?;

    let service = state.store.update_service(id, payload)?;
    info!(service_id = service.id, "service offering updated");
    Ok(Json(service))
}

async fn delete_service(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    caller.require_admin()?;

    state.store.delete_service(id)?;
    info!(service_id = id, "service offering deleted");
    Ok(StatusCode::NO_CONTENT)
}
