use chrono::{DateTime, Utc};
use seva_core::models::{UpdateProfileRequest, UserProfile};
use seva_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, phone_number, age, sex, \
    marital_status, location, family_size, annual_income, residence_type, social_category, \
    disability, disability_percentage, minority, student, employment_status, \
    government_employee, land_size_hectares, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    phone_number: Option<String>,
    age: Option<i32>,
    sex: Option<String>,
    marital_status: Option<String>,
    location: Option<String>,
    family_size: Option<i32>,
    annual_income: Option<i64>,
    residence_type: Option<String>,
    social_category: Option<String>,
    disability: bool,
    disability_percentage: Option<i32>,
    minority: bool,
    student: bool,
    employment_status: Option<String>,
    government_employee: bool,
    land_size_hectares: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone_number: row.phone_number,
            age: row.age,
            sex: row.sex,
            marital_status: row.marital_status,
            location: row.location,
            family_size: row.family_size,
            annual_income: row.annual_income,
            residence_type: row.residence_type,
            social_category: row.social_category,
            disability: row.disability,
            disability_percentage: row.disability_percentage,
            minority: row.minority,
            student: row.student,
            employment_status: row.employment_status,
            government_employee: row.government_employee,
            land_size_hectares: row.land_size_hectares,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for registered users and their demographic profiles
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

/// Fields persisted at registration; demographics arrive later via profile update.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub location: Option<String>,
    pub annual_income: Option<i64>,
    pub family_size: Option<i32>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user. Email uniqueness is enforced by the database.
    #[tracing::instrument(skip(self, user), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user(&self, user: NewUser) -> Result<UserProfile, AppError> {
        let row = sqlx::query_as::<Postgres, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, phone_number, age, sex, location, annual_income, family_size)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone_number)
        .bind(user.age)
        .bind(&user.sex)
        .bind(&user.location)
        .bind(user.annual_income)
        .bind(user.family_size)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::BadRequest("Email is already registered".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<Postgres, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<Postgres, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Apply a partial profile update; absent fields keep their stored value.
    #[tracing::instrument(skip(self, update), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let row = sqlx::query_as::<Postgres, UserRow>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                phone_number = COALESCE($3, phone_number),
                age = COALESCE($4, age),
                sex = COALESCE($5, sex),
                marital_status = COALESCE($6, marital_status),
                location = COALESCE($7, location),
                family_size = COALESCE($8, family_size),
                annual_income = COALESCE($9, annual_income),
                residence_type = COALESCE($10, residence_type),
                social_category = COALESCE($11, social_category),
                disability = COALESCE($12, disability),
                disability_percentage = COALESCE($13, disability_percentage),
                minority = COALESCE($14, minority),
                student = COALESCE($15, student),
                employment_status = COALESCE($16, employment_status),
                government_employee = COALESCE($17, government_employee),
                land_size_hectares = COALESCE($18, land_size_hectares),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.phone_number)
        .bind(update.age)
        .bind(&update.sex)
        .bind(&update.marital_status)
        .bind(&update.location)
        .bind(update.family_size)
        .bind(update.annual_income)
        .bind(&update.residence_type)
        .bind(&update.social_category)
        .bind(update.disability)
        .bind(update.disability_percentage)
        .bind(update.minority)
        .bind(update.student)
        .bind(&update.employment_status)
        .bind(update.government_employee)
        .bind(update.land_size_hectares)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(row.into())
    }
}
