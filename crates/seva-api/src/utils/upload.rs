//! Common utilities for the document upload handler

use axum::extract::Multipart;
use seva_core::models::DocumentType;
use seva_core::AppError;

/// File and declared type extracted from a `/verify` multipart body.
pub struct UploadFields {
    pub data: Vec<u8>,
    pub file_name: String,
    pub document_type: DocumentType,
}

/// Extract the file and documentType fields from multipart form data.
/// Exactly one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_upload_fields(mut multipart: Multipart) -> Result<UploadFields, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut document_type: Option<DocumentType> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file_data.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                file_name = field.file_name().map(|s: &str| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            "documentType" => {
                let raw = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read documentType: {}", e))
                })?;
                document_type = Some(raw.parse()?);
            }
            _ => {}
        }
    }

    let data = file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    let document_type = document_type
        .ok_or_else(|| AppError::InvalidInput("No documentType provided".to_string()))?;

    if data.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    Ok(UploadFields {
        data,
        file_name: file_name.unwrap_or_else(|| "document".to_string()),
        document_type,
    })
}

/// Validate file size against the configured maximum. Runs before any
/// storage or network I/O.
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_size() {
        let max = 10 * 1024 * 1024;
        assert!(validate_file_size(0, max).is_ok());
        assert!(validate_file_size(max, max).is_ok());

        let err = validate_file_size(12 * 1024 * 1024, max).unwrap_err();
        match err {
            AppError::PayloadTooLarge(msg) => assert!(msg.contains("10 MB")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
