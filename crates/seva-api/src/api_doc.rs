//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use seva_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Digital Seva API",
        version = "0.1.0",
        description = "Citizen welfare portal backend: profile management, scheme eligibility matching, document verification, and application tracking."
    ),
    paths(
        handlers::health::health,
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        // Users
        handlers::users::get_me,
        handlers::users::update_me,
        // Schemes
        handlers::schemes::get_catalog,
        handlers::schemes::list_matched,
        // Documents
        handlers::documents::verify_document,
        handlers::documents::list_documents,
        // Applications
        handlers::applications::create_application,
        handlers::applications::list_applications,
        handlers::applications::list_all_applications,
        handlers::applications::update_application_status,
        // Assistant
        handlers::assistant::chat,
    ),
    components(schemas(
        error::ErrorResponse,
        models::RegisterRequest,
        models::LoginRequest,
        models::TokenResponse,
        models::UpdateProfileRequest,
        models::UserResponse,
        models::Scheme,
        models::SchemeStatus,
        models::SchemeSummary,
        models::DocumentType,
        models::VerificationStatus,
        models::VerificationResult,
        models::DocumentResponse,
        models::CreateApplicationRequest,
        models::UpdateApplicationStatusRequest,
        models::ApplicationResponse,
        models::ApplicationStatus,
        handlers::assistant::ChatRequest,
        handlers::assistant::HistoryMessage,
        handlers::assistant::ChatResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Profile management"),
        (name = "schemes", description = "Scheme catalog and eligibility matching"),
        (name = "documents", description = "Document upload and verification"),
        (name = "applications", description = "Scheme applications"),
        (name = "assistant", description = "Chat assistant proxy"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_builds() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json["paths"].get("/verify").is_some());
        assert!(json["paths"].get("/api/applications").is_some());
        assert!(json["paths"].get("/api/schemes").is_some());
    }
}
