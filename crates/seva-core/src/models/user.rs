use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A registered citizen and their demographic profile.
///
/// Created at registration with the required identity fields only; every
/// demographic attribute is optional and filled in later through the profile
/// update operation. The eligibility matcher treats absent attributes as
/// failing any criterion that needs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub marital_status: Option<String>,
    pub location: Option<String>,
    pub family_size: Option<i32>,
    pub annual_income: Option<i64>,
    pub residence_type: Option<String>,
    pub social_category: Option<String>,
    pub disability: bool,
    pub disability_percentage: Option<i32>,
    pub minority: bool,
    pub student: bool,
    pub employment_status: Option<String>,
    pub government_employee: bool,
    pub land_size_hectares: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request. Demographics beyond the basics arrive later via
/// profile update.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 130, message = "Age must be between 0 and 130"))]
    pub age: Option<i32>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Annual income cannot be negative"))]
    pub annual_income: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, message = "Family size must be at least 1"))]
    pub family_size: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

/// Issued on successful registration or login.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Profile update. Only provided fields change; `None` means "leave as is".
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 130, message = "Age must be between 0 and 130"))]
    pub age: Option<i32>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "Family size must be at least 1"))]
    pub family_size: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Annual income cannot be negative"))]
    pub annual_income: Option<i64>,
    #[serde(default)]
    pub residence_type: Option<String>,
    #[serde(default)]
    pub social_category: Option<String>,
    #[serde(default)]
    pub disability: Option<bool>,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "Disability percentage must be 0-100"))]
    pub disability_percentage: Option<i32>,
    #[serde(default)]
    pub minority: Option<bool>,
    #[serde(default)]
    pub student: Option<bool>,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default)]
    pub government_employee: Option<bool>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Land size cannot be negative"))]
    pub land_size_hectares: Option<f64>,
}

/// Profile as returned to the owning user. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub marital_status: Option<String>,
    pub location: Option<String>,
    pub family_size: Option<i32>,
    pub annual_income: Option<i64>,
    pub residence_type: Option<String>,
    pub social_category: Option<String>,
    pub disability: bool,
    pub disability_percentage: Option<i32>,
    pub minority: bool,
    pub student: bool,
    pub employment_status: Option<String>,
    pub government_employee: bool,
    pub land_size_hectares: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            age: user.age,
            sex: user.sex,
            marital_status: user.marital_status,
            location: user.location,
            family_size: user.family_size,
            annual_income: user.annual_income,
            residence_type: user.residence_type,
            social_category: user.social_category,
            disability: user.disability,
            disability_percentage: user.disability_percentage,
            minority: user.minority,
            student: user.student,
            employment_status: user.employment_status,
            government_employee: user.government_employee,
            land_size_hectares: user.land_size_hectares,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn test_profile() -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            name: "Asha Patel".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            phone_number: Some("+91-9876543210".to_string()),
            age: Some(34),
            sex: Some("female".to_string()),
            marital_status: Some("married".to_string()),
            location: Some("Madhya Pradesh".to_string()),
            family_size: Some(4),
            annual_income: Some(120_000),
            residence_type: Some("rural".to_string()),
            social_category: Some("OBC".to_string()),
            disability: false,
            disability_percentage: None,
            minority: false,
            student: false,
            employment_status: Some("self-employed".to_string()),
            government_employee: false,
            land_size_hectares: Some(1.5),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_response_omits_password_hash() {
        let response = UserResponse::from(test_profile());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "asha@example.com");
        assert_eq!(json["annual_income"], 120_000);
    }

    #[test]
    fn test_profile_serialization_skips_password_hash() {
        let json = serde_json::to_value(test_profile()).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            password: "longenough".to_string(),
            phone_number: None,
            age: Some(28),
            sex: None,
            location: None,
            annual_income: Some(50_000),
            family_size: Some(3),
        };
        assert!(ok.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok_fields()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..ok_fields()
        };
        assert!(short_password.validate().is_err());
    }

    fn ok_fields() -> RegisterRequest {
        RegisterRequest {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            password: "longenough".to_string(),
            phone_number: None,
            age: None,
            sex: None,
            location: None,
            annual_income: None,
            family_size: None,
        }
    }
}
