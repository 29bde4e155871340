use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use seva_core::models::{
    Application, ApplicationResponse, CreateApplicationRequest, SchemeSummary,
    UpdateApplicationStatusRequest,
};
use seva_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

fn to_response(state: &AppState, application: Application) -> ApplicationResponse {
    let scheme = state.catalog.get(application.scheme_id).map(SchemeSummary::from);
    ApplicationResponse::from_application(application, scheme)
}

#[utoipa::path(
    post,
    path = "/api/applications",
    tag = "applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application created", body = ApplicationResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Scheme or document not found", body = ErrorResponse),
        (status = 409, description = "Application already exists for this scheme", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.user_id, scheme_id = request.scheme_id, operation = "apply"))]
pub async fn create_application(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let scheme = state
        .catalog
        .get(request.scheme_id)
        .ok_or_else(|| AppError::NotFound(format!("Scheme {} not found", request.scheme_id)))?;

    // Referenced documents must exist and belong to the caller. Their
    // verification state is surfaced to the reviewer, not enforced here.
    let records = state
        .db
        .documents
        .get_by_ids(auth.user_id, &request.documents)
        .await?;
    if records.len() != request.documents.len() {
        let found: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let missing: Vec<String> = request
            .documents
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect();
        return Err(AppError::NotFound(format!(
            "Document record(s) not found: {}",
            missing.join(", ")
        ))
        .into());
    }

    let application = state
        .db
        .applications
        .create(auth.user_id, scheme.id, &request.documents)
        .await?;

    tracing::info!(application_id = %application.id, "Application submitted");
    Ok((
        StatusCode::CREATED,
        Json(to_response(&state, application)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    tag = "applications",
    responses(
        (status = 200, description = "Caller's applications, most recent first", body = [ApplicationResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id, operation = "list_applications"))]
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let applications = state.db.applications.list_for_user(auth.user_id).await?;
    let responses: Vec<ApplicationResponse> = applications
        .into_iter()
        .map(|application| to_response(&state, application))
        .collect();
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/applications/all",
    tag = "applications",
    responses(
        (status = 200, description = "All applications (administrative)", body = [ApplicationResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_all_applications"))]
pub async fn list_all_applications(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let applications = state.db.applications.list_all().await?;
    let responses: Vec<ApplicationResponse> = applications
        .into_iter()
        .map(|application| to_response(&state, application))
        .collect();
    Ok(Json(responses))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}/status",
    tag = "applications",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApplicationResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 409, description = "Invalid status transition", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(application_id = %id, operation = "update_application_status"))]
pub async fn update_application_status(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApplicationStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let application = state
        .db
        .applications
        .update_status(id, request.status)
        .await?;

    tracing::info!(application_id = %application.id, status = %application.status, "Application status updated");
    Ok(Json(to_response(&state, application)))
}
