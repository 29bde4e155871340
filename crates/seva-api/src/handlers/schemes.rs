use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use seva_core::models::Scheme;
use seva_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/schemes/catalog",
    tag = "schemes",
    responses(
        (status = 200, description = "Full scheme catalog", body = [Scheme])
    )
)]
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.catalog.schemes().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/schemes",
    tag = "schemes",
    responses(
        (status = 200, description = "Schemes the caller is eligible for, ranked", body = [Scheme]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id, operation = "match_schemes"))]
pub async fn list_matched(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .db
        .users
        .get_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let today = Utc::now().date_naive();
    let matched: Vec<Scheme> = seva_core::match_schemes(&user, state.catalog.schemes(), today)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(matched = matched.len(), "Eligibility match completed");
    Ok(Json(matched))
}
