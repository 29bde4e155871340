use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_upload_fields, validate_file_size};
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use seva_core::models::{DocumentResponse, VerificationResult};
use seva_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/verify",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Verification attempt completed (check isValid)", body = VerificationResult),
        (status = 400, description = "Invalid input or document type", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %auth.user_id, operation = "verify_document"))]
pub async fn verify_document(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = extract_upload_fields(multipart).await?;

    // Size check happens before any storage write or network call.
    validate_file_size(upload.data.len(), state.documents.max_file_size)?;

    state
        .db
        .users
        .get_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let storage_key = seva_storage::document_key(
        auth.user_id,
        upload.document_type.as_str(),
        &upload.file_name,
    );
    state
        .documents
        .storage
        .upload(&storage_key, Bytes::from(upload.data.clone()))
        .await?;

    // A fresh upload supersedes any prior record for this (user, type) pair.
    let record = state
        .db
        .documents
        .upsert(
            auth.user_id,
            upload.document_type,
            &storage_key,
            upload.data.len() as i64,
        )
        .await?;
    state
        .db
        .documents
        .mark_verifying(auth.user_id, upload.document_type)
        .await?;

    tracing::info!(
        document_type = %upload.document_type,
        record_id = %record.id,
        size = upload.data.len(),
        "Document stored, dispatching verification"
    );

    // Collaborator failures come back as a failed result, not an error; the
    // record always leaves the verifying state.
    let result = state
        .documents
        .verifier
        .verify(&upload.file_name, upload.data, upload.document_type)
        .await;

    state
        .db
        .documents
        .mark_verified(auth.user_id, upload.document_type, &result)
        .await?;

    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Caller's document records", body = [DocumentResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id, operation = "list_documents"))]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.db.documents.list_for_user(auth.user_id).await?;
    let documents: Vec<DocumentResponse> = records.into_iter().map(Into::into).collect();
    Ok(Json(documents))
}
