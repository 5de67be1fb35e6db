use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{Caller, Role};

/// Set by the authenticating gateway in front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|err| AppError::Unauthorized(format!("invalid {USER_ID_HEADER}: {err}")))?;
        let role = header(parts, USER_ROLE_HEADER)?.parse::<Role>()?;

        Ok(Caller::new(user_id, role))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Unauthorized(format!("missing {name} header")))?
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("{name} header is not valid text")))
}
