use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::cargo::ConstraintViolation;
use crate::models::request::RequestStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("constraint violated: {0}")]
    Constraint(ConstraintViolation),

    #[error("cannot {action} a request in status {from}")]
    StateTransition {
        from: RequestStatus,
        action: &'static str,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Constraint(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::StateTransition { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Constraint(violation) => json!({
                "error": self.to_string(),
                "violation": violation,
            }),
            AppError::Persistence(msg) => {
                tracing::error!(error = %msg, "storage failure");
                json!({ "error": "storage failure" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
