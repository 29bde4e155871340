//! External document verification client.
//!
//! Forwards an uploaded file and its declared type to the verification
//! collaborator and normalizes whatever comes back into a
//! [`VerificationResult`]. Collaborator failures (connect errors, timeouts,
//! non-2xx, malformed payloads) are absorbed into a failed-but-valid result
//! so the caller always receives a well-shaped outcome and the document
//! record never sticks at "verifying".

use std::time::{Duration, Instant};

use serde::Deserialize;
use seva_core::models::{DocumentType, VerificationResult};
use seva_core::AppError;

/// Response body the verifier returns on a completed attempt. Field names
/// follow its wire format; everything beyond `isValid` is optional and
/// defaulted during normalization.
#[derive(Debug, Deserialize)]
struct VerifierResponse {
    #[serde(rename = "isValid", default)]
    is_valid: bool,
    #[serde(rename = "confidenceScore", alias = "confidence", default)]
    confidence_score: Option<f32>,
    #[serde(default)]
    errors: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

/// Normalize a parsed verifier body: missing confidence becomes 0, the score
/// is clamped to [0,1], and a top-level `error` message joins the error list.
fn normalize_response(document_type: DocumentType, response: VerifierResponse) -> VerificationResult {
    let mut errors = response.errors.unwrap_or_default();
    if let Some(error) = response.error {
        if !errors.contains(&error) {
            errors.push(error);
        }
    }
    VerificationResult {
        is_valid: response.is_valid,
        confidence_score: response.confidence_score.unwrap_or(0.0).clamp(0.0, 1.0),
        document_type,
        errors,
    }
}

/// Parse and normalize a raw success body; a malformed payload becomes a
/// failed result rather than an error.
fn parse_body(document_type: DocumentType, body: &str) -> VerificationResult {
    match serde_json::from_str::<VerifierResponse>(body) {
        Ok(response) => normalize_response(document_type, response),
        Err(e) => VerificationResult::failure(
            document_type,
            format!("Verifier returned malformed response: {}", e),
        ),
    }
}

#[derive(Clone)]
pub struct DocumentVerifierService {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl DocumentVerifierService {
    /// Create a verifier client with a hard per-attempt timeout.
    pub fn new(endpoint: String, timeout_secs: u64) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to create verifier HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            endpoint,
            timeout_secs,
        })
    }

    /// Send the file to the external verifier and normalize the outcome.
    ///
    /// Never fails: every collaborator problem is folded into a
    /// `VerificationResult` with `is_valid = false` and a readable reason.
    pub async fn verify(
        &self,
        file_name: &str,
        data: Vec<u8>,
        document_type: DocumentType,
    ) -> VerificationResult {
        let start = Instant::now();
        tracing::debug!(endpoint = %self.endpoint, document_type = %document_type, size = data.len(), "Dispatching document for verification");

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("documentType", document_type.as_str());

        let response = match self.client.post(&self.endpoint).multipart(form).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!(document_type = %document_type, timeout_secs = self.timeout_secs, "Verification timed out");
                return VerificationResult::failure(
                    document_type,
                    format!("Verification timed out after {} seconds", self.timeout_secs),
                );
            }
            Err(e) => {
                tracing::warn!(document_type = %document_type, error = %e, "Verification request failed");
                return VerificationResult::failure(
                    document_type,
                    format!("Verification service unreachable: {}", e),
                );
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return VerificationResult::failure(
                    document_type,
                    format!("Failed to read verifier response: {}", e),
                );
            }
        };

        let result = if status.is_success() {
            parse_body(document_type, &body)
        } else {
            // The verifier reports validation failures as 4xx with the same
            // JSON shape; keep its error detail when present.
            let mut result = parse_body(document_type, &body);
            result.is_valid = false;
            if result.errors.is_empty() {
                result
                    .errors
                    .push(format!("Verifier responded with status {}", status));
            }
            result
        };

        tracing::info!(
            document_type = %document_type,
            is_valid = result.is_valid,
            confidence = result.confidence_score,
            duration_ms = start.elapsed().as_millis(),
            "Verification attempt completed"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_success_body() {
        let body = r#"{"isValid": true, "confidenceScore": 0.92, "documentType": "Aadhar Card", "errors": []}"#;
        let result = parse_body(DocumentType::AadharCard, body);
        assert!(result.is_valid);
        assert!((result.confidence_score - 0.92).abs() < 1e-6);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_confidence_defaults_to_zero() {
        let body = r#"{"isValid": true}"#;
        let result = parse_body(DocumentType::PanCard, body);
        assert!(result.is_valid);
        assert_eq!(result.confidence_score, 0.0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let body = r#"{"isValid": true, "confidenceScore": 1.7}"#;
        assert_eq!(parse_body(DocumentType::PanCard, body).confidence_score, 1.0);

        let body = r#"{"isValid": false, "confidenceScore": -0.3}"#;
        assert_eq!(parse_body(DocumentType::PanCard, body).confidence_score, 0.0);
    }

    #[test]
    fn test_confidence_alias_accepted() {
        let body = r#"{"isValid": false, "confidence": 0.4, "errors": ["Aadhaar number not found"]}"#;
        let result = parse_body(DocumentType::AadharCard, body);
        assert!(!result.is_valid);
        assert!((result.confidence_score - 0.4).abs() < 1e-6);
        assert_eq!(result.errors, vec!["Aadhaar number not found".to_string()]);
    }

    #[test]
    fn test_top_level_error_joins_error_list() {
        let body = r#"{"error": "No text could be extracted from document", "isValid": false, "confidence": 0}"#;
        let result = parse_body(DocumentType::RationCard, body);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["No text could be extracted from document".to_string()]
        );
    }

    #[test]
    fn test_malformed_body_becomes_failed_result() {
        let result = parse_body(DocumentType::VoterId, "<html>gateway error</html>");
        assert!(!result.is_valid);
        assert_eq!(result.confidence_score, 0.0);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("malformed"));
    }

    #[test]
    fn test_failure_constructor_shape() {
        let result =
            VerificationResult::failure(DocumentType::DrivingLicense, "connection refused");
        assert!(!result.is_valid);
        assert_eq!(result.document_type, DocumentType::DrivingLicense);
        assert_eq!(result.errors, vec!["connection refused".to_string()]);
    }
}
