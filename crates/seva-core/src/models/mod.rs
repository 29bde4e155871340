//! Domain models shared across all Digital Seva components.

pub mod application;
pub mod document;
pub mod scheme;
pub mod user;

pub use application::{
    Application, ApplicationResponse, ApplicationStatus, CreateApplicationRequest,
    UpdateApplicationStatusRequest,
};
pub use document::{
    DocumentRecord, DocumentResponse, DocumentType, VerificationResult, VerificationStatus,
};
pub use scheme::{
    Deadline, EligibilityCriterion, FlagField, NumericField, Scheme, SchemeStatus, SchemeSummary,
    TextField,
};
pub use user::{
    LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest, UserProfile, UserResponse,
};
