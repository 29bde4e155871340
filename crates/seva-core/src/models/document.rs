use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Identity/eligibility document kinds accepted by the portal.
///
/// Wire representation is the exact case-sensitive display string
/// (e.g. "Aadhar Card"); unknown strings are rejected with
/// `AppError::InvalidDocumentType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DocumentType {
    #[serde(rename = "Aadhar Card")]
    AadharCard,
    #[serde(rename = "PAN Card")]
    PanCard,
    #[serde(rename = "Caste Certificate")]
    CasteCertificate,
    #[serde(rename = "Ration Card")]
    RationCard,
    #[serde(rename = "Voter ID")]
    VoterId,
    #[serde(rename = "Driving License")]
    DrivingLicense,
    #[serde(rename = "Income Certificate")]
    IncomeCertificate,
    #[serde(rename = "Disability Certificate")]
    DisabilityCertificate,
    #[serde(rename = "Birth Certificate")]
    BirthCertificate,
    #[serde(rename = "Marriage Certificate")]
    MarriageCertificate,
    #[serde(rename = "Bank Passbook")]
    BankPassbook,
    #[serde(rename = "Employment Certificate")]
    EmploymentCertificate,
    #[serde(rename = "Educational Certificates")]
    EducationalCertificates,
    #[serde(rename = "Property Documents")]
    PropertyDocuments,
}

impl DocumentType {
    /// All accepted types, in display order.
    pub const ALL: [DocumentType; 14] = [
        DocumentType::AadharCard,
        DocumentType::PanCard,
        DocumentType::CasteCertificate,
        DocumentType::RationCard,
        DocumentType::VoterId,
        DocumentType::DrivingLicense,
        DocumentType::IncomeCertificate,
        DocumentType::DisabilityCertificate,
        DocumentType::BirthCertificate,
        DocumentType::MarriageCertificate,
        DocumentType::BankPassbook,
        DocumentType::EmploymentCertificate,
        DocumentType::EducationalCertificates,
        DocumentType::PropertyDocuments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::AadharCard => "Aadhar Card",
            DocumentType::PanCard => "PAN Card",
            DocumentType::CasteCertificate => "Caste Certificate",
            DocumentType::RationCard => "Ration Card",
            DocumentType::VoterId => "Voter ID",
            DocumentType::DrivingLicense => "Driving License",
            DocumentType::IncomeCertificate => "Income Certificate",
            DocumentType::DisabilityCertificate => "Disability Certificate",
            DocumentType::BirthCertificate => "Birth Certificate",
            DocumentType::MarriageCertificate => "Marriage Certificate",
            DocumentType::BankPassbook => "Bank Passbook",
            DocumentType::EmploymentCertificate => "Employment Certificate",
            DocumentType::EducationalCertificates => "Educational Certificates",
            DocumentType::PropertyDocuments => "Property Documents",
        }
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::InvalidDocumentType(s.to_string()))
    }
}

/// Per-document verification lifecycle: Pending -> Verifying -> {Verified | Failed}.
/// A failed verification is cleared only by a fresh upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verifying,
    Verified,
    Failed,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verifying => "verifying",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Failed => "failed",
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "verifying" => Ok(VerificationStatus::Verifying),
            "verified" => Ok(VerificationStatus::Verified),
            "failed" => Ok(VerificationStatus::Failed),
            other => Err(AppError::Internal(format!(
                "Unknown verification status in storage: {}",
                other
            ))),
        }
    }
}

/// Normalized outcome of one verification attempt.
///
/// Field names follow the verifier wire format (camelCase). A collaborator
/// failure is absorbed into `is_valid = false` with a readable reason in
/// `errors` rather than propagated as an API error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    pub confidence_score: f32,
    pub document_type: DocumentType,
    pub errors: Vec<String>,
}

impl VerificationResult {
    /// Result representing an absorbed collaborator failure.
    pub fn failure(document_type: DocumentType, reason: impl Into<String>) -> Self {
        VerificationResult {
            is_valid: false,
            confidence_score: 0.0,
            document_type,
            errors: vec![reason.into()],
        }
    }
}

/// Metadata for one uploaded document. One record per (user, document type);
/// a re-upload for the same type supersedes the old record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: DocumentType,
    pub file_path: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub status: VerificationStatus,
    pub is_verified: bool,
    pub confidence_score: Option<f32>,
    pub verification_errors: Vec<String>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub document_type: DocumentType,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub status: VerificationStatus,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verification_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<DocumentRecord> for DocumentResponse {
    fn from(record: DocumentRecord) -> Self {
        DocumentResponse {
            id: record.id,
            document_type: record.document_type,
            file_size: record.file_size,
            uploaded_at: record.uploaded_at,
            status: record.status,
            is_verified: record.is_verified,
            confidence_score: record.confidence_score,
            verification_errors: record.verification_errors,
            verified_at: record.verified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_wire_strings_round_trip() {
        for doc_type in DocumentType::ALL {
            let parsed: DocumentType = doc_type.as_str().parse().unwrap();
            assert_eq!(parsed, doc_type);

            let json = serde_json::to_string(&doc_type).unwrap();
            assert_eq!(json, format!("\"{}\"", doc_type.as_str()));
            let back: DocumentType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, doc_type);
        }
    }

    #[test]
    fn test_document_type_rejects_unknown() {
        let err = "Library Card".parse::<DocumentType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidDocumentType(_)));
        // Wire strings are case-sensitive.
        assert!("aadhar card".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_verification_result_wire_shape() {
        let result = VerificationResult {
            is_valid: true,
            confidence_score: 0.92,
            document_type: DocumentType::AadharCard,
            errors: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], true);
        assert!((json["confidenceScore"].as_f64().unwrap() - 0.92).abs() < 1e-6);
        assert_eq!(json["documentType"], "Aadhar Card");
        assert_eq!(json["errors"], serde_json::json!([]));
    }

    #[test]
    fn test_verification_failure_shape() {
        let result = VerificationResult::failure(DocumentType::PanCard, "verifier timed out");
        assert!(!result.is_valid);
        assert_eq!(result.confidence_score, 0.0);
        assert_eq!(result.errors, vec!["verifier timed out".to_string()]);
    }

    #[test]
    fn test_verification_status_round_trip() {
        for status in [
            VerificationStatus::Pending,
            VerificationStatus::Verifying,
            VerificationStatus::Verified,
            VerificationStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<VerificationStatus>().unwrap(), status);
        }
        assert!("done".parse::<VerificationStatus>().is_err());
    }
}
