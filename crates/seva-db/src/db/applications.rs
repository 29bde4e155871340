use chrono::{DateTime, Utc};
use seva_core::models::{Application, ApplicationStatus};
use seva_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

const APPLICATION_COLUMNS: &str =
    "id, user_id, scheme_id, status, document_ids, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: Uuid,
    user_id: Uuid,
    scheme_id: i32,
    status: String,
    document_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn into_application(self) -> Result<Application, AppError> {
        Ok(Application {
            id: self.id,
            user_id: self.user_id,
            scheme_id: self.scheme_id,
            status: self.status.parse()?,
            document_ids: self.document_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for scheme applications.
///
/// Applications are append-only: rows are never deleted, and the status can
/// move from pending to a terminal state exactly once. The
/// `UNIQUE(user_id, scheme_id)` constraint rejects resubmission.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, document_ids), fields(db.table = "applications", db.operation = "insert"))]
    pub async fn create(
        &self,
        user_id: Uuid,
        scheme_id: i32,
        document_ids: &[Uuid],
    ) -> Result<Application, AppError> {
        let row = sqlx::query_as::<Postgres, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications (user_id, scheme_id, status, document_ids)
            VALUES ($1, $2, 'pending', $3)
            RETURNING {APPLICATION_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(scheme_id)
        .bind(document_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateApplication { scheme_id }
            }
            _ => AppError::from(e),
        })?;

        row.into_application()
    }

    #[tracing::instrument(skip(self), fields(db.table = "applications", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<Postgres, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApplicationRow::into_application).transpose()
    }

    /// The caller's applications, most recent first.
    #[tracing::instrument(skip(self), fields(db.table = "applications", db.operation = "select"))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<Postgres, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(ApplicationRow::into_application)
            .collect()
    }

    /// Administrative projection across all users.
    #[tracing::instrument(skip(self), fields(db.table = "applications", db.operation = "select"))]
    pub async fn list_all(&self) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<Postgres, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY created_at ASC",
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(ApplicationRow::into_application)
            .collect()
    }

    /// Apply a status transition. Only pending -> approved and
    /// pending -> rejected are allowed; the UPDATE is guarded on the pending
    /// state so a concurrent reviewer cannot overwrite a terminal decision.
    #[tracing::instrument(skip(self), fields(db.table = "applications", db.operation = "update", db.record_id = %id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let current = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))?;

        if !current.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition {
                from: current.status.to_string(),
                to: new_status.to_string(),
            });
        }

        let row = sqlx::query_as::<Postgres, ApplicationRow>(&format!(
            r#"
            UPDATE applications SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {APPLICATION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(new_status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_application(),
            // Lost a race with another reviewer: the record left pending
            // between our check and the guarded update.
            None => Err(AppError::InvalidTransition {
                from: self
                    .get(id)
                    .await?
                    .map(|a| a.status.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                to: new_status.to_string(),
            }),
        }
    }
}
