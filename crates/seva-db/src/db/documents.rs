use chrono::{DateTime, Utc};
use seva_core::models::{DocumentRecord, DocumentType, VerificationResult, VerificationStatus};
use seva_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

const DOCUMENT_COLUMNS: &str = "id, user_id, document_type, file_path, file_size, uploaded_at, \
    status, is_verified, confidence_score, verification_errors, verified_at";

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    user_id: Uuid,
    document_type: String,
    file_path: String,
    file_size: i64,
    uploaded_at: DateTime<Utc>,
    status: String,
    is_verified: bool,
    confidence_score: Option<f32>,
    verification_errors: Vec<String>,
    verified_at: Option<DateTime<Utc>>,
}

impl DocumentRow {
    fn into_record(self) -> Result<DocumentRecord, AppError> {
        Ok(DocumentRecord {
            id: self.id,
            user_id: self.user_id,
            document_type: self.document_type.parse()?,
            file_path: self.file_path,
            file_size: self.file_size,
            uploaded_at: self.uploaded_at,
            status: self.status.parse()?,
            is_verified: self.is_verified,
            confidence_score: self.confidence_score,
            verification_errors: self.verification_errors,
            verified_at: self.verified_at,
        })
    }
}

/// Repository for uploaded-document metadata.
///
/// One record per (user, document type): the `UNIQUE(user_id, document_type)`
/// constraint makes the upsert the serialization point for concurrent
/// uploads of the same type, so exactly one row survives (last writer wins).
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a fresh record or supersede the existing one for this
    /// (user, type) pair, resetting the verification state.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "upsert", document_type = %document_type))]
    pub async fn upsert(
        &self,
        user_id: Uuid,
        document_type: DocumentType,
        file_path: &str,
        file_size: i64,
    ) -> Result<DocumentRecord, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            r#"
            INSERT INTO documents (user_id, document_type, file_path, file_size, status, is_verified)
            VALUES ($1, $2, $3, $4, 'pending', FALSE)
            ON CONFLICT (user_id, document_type) DO UPDATE SET
                file_path = EXCLUDED.file_path,
                file_size = EXCLUDED.file_size,
                uploaded_at = NOW(),
                status = 'pending',
                is_verified = FALSE,
                confidence_score = NULL,
                verification_errors = '{{}}',
                verified_at = NULL
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(document_type.as_str())
        .bind(file_path)
        .bind(file_size)
        .fetch_one(&self.pool)
        .await?;

        row.into_record()
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 ORDER BY uploaded_at DESC",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DocumentRow::into_record).collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", document_type = %document_type))]
    pub async fn get(
        &self,
        user_id: Uuid,
        document_type: DocumentType,
    ) -> Result<Option<DocumentRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 AND document_type = $2",
        ))
        .bind(user_id)
        .bind(document_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DocumentRow::into_record).transpose()
    }

    /// Fetch the caller's records matching the given IDs (records belonging
    /// to other users are silently absent from the result).
    #[tracing::instrument(skip(self, ids), fields(db.table = "documents", db.operation = "select", id_count = ids.len()))]
    pub async fn get_by_ids(
        &self,
        user_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<DocumentRecord>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 AND id = ANY($2)",
        ))
        .bind(user_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DocumentRow::into_record).collect()
    }

    /// Move a record from pending to verifying before dispatching to the
    /// external verifier.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "update", document_type = %document_type))]
    pub async fn mark_verifying(
        &self,
        user_id: Uuid,
        document_type: DocumentType,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE documents SET status = 'verifying' WHERE user_id = $1 AND document_type = $2",
        )
        .bind(user_id)
        .bind(document_type.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No document record for type {}",
                document_type
            )));
        }
        Ok(())
    }

    /// Persist the outcome of a verification attempt. Idempotent: repeating
    /// the same result leaves the record unchanged.
    #[tracing::instrument(skip(self, result), fields(db.table = "documents", db.operation = "update", document_type = %document_type, is_valid = result.is_valid))]
    pub async fn mark_verified(
        &self,
        user_id: Uuid,
        document_type: DocumentType,
        result: &VerificationResult,
    ) -> Result<DocumentRecord, AppError> {
        let status = if result.is_valid {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed
        };

        let row = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            r#"
            UPDATE documents SET
                status = $3,
                is_verified = $4,
                confidence_score = $5,
                verification_errors = $6,
                verified_at = NOW()
            WHERE user_id = $1 AND document_type = $2
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(document_type.as_str())
        .bind(status.as_str())
        .bind(result.is_valid)
        .bind(result.confidence_score)
        .bind(&result.errors)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No document record for type {}", document_type))
        })?;

        row.into_record()
    }
}
