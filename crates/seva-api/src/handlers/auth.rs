use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use seva_core::models::{LoginRequest, RegisterRequest, TokenResponse};
use seva_core::AppError;
use seva_db::db::users::NewUser;
use std::sync::Arc;
use validator::Validate;

async fn hash_password(password: String) -> Result<String, AppError> {
    // bcrypt is CPU-bound; keep it off the async workers.
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Invalid input or email already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "register"))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let password_hash = hash_password(request.password).await?;
    let user = state
        .db
        .users
        .create_user(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            phone_number: request.phone_number,
            age: request.age,
            sex: request.sex,
            location: request.location,
            annual_income: request.annual_income,
            family_size: request.family_size,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let token = state.jwt.issue(user.id)?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "login"))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    // Unknown email and wrong password produce the same response.
    let user = state
        .db
        .users
        .get_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()).into());
    }

    let token = state.jwt.issue(user.id)?;
    Ok(Json(TokenResponse { token }))
}
