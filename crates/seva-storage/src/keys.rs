//! Shared key generation for storage backends.
//!
//! Key format: `documents/{user_id}/{document-type-slug}-{uuid}.{ext}`.
//! Keys carry a fresh UUID per upload so a superseded file never collides
//! with its replacement.

use uuid::Uuid;

/// Lowercase alphanumeric slug for a document type display name
/// (e.g. "Aadhar Card" -> "aadhar-card").
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Extract a safe lowercase extension from an original filename.
fn safe_extension(original_filename: &str) -> Option<String> {
    let ext = original_filename.rsplit_once('.')?.1;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Generate a storage key for a document upload.
pub fn document_key(user_id: Uuid, document_type: &str, original_filename: &str) -> String {
    let slug = slugify(document_type);
    let id = Uuid::new_v4();
    match safe_extension(original_filename) {
        Some(ext) => format!("documents/{}/{}-{}.{}", user_id, slug, id, ext),
        None => format!("documents/{}/{}-{}", user_id, slug, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Aadhar Card"), "aadhar-card");
        assert_eq!(slugify("PAN Card"), "pan-card");
        assert_eq!(slugify("Voter ID"), "voter-id");
        assert_eq!(slugify("  weird -- name  "), "weird-name");
    }

    #[test]
    fn test_safe_extension() {
        assert_eq!(safe_extension("scan.PDF"), Some("pdf".to_string()));
        assert_eq!(safe_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(safe_extension("no-extension"), None);
        assert_eq!(safe_extension("trailing-dot."), None);
        assert_eq!(safe_extension("bad.e{t"), None);
    }

    #[test]
    fn test_document_key_shape() {
        let user_id = Uuid::new_v4();
        let key = document_key(user_id, "Aadhar Card", "scan.pdf");
        assert!(key.starts_with(&format!("documents/{}/aadhar-card-", user_id)));
        assert!(key.ends_with(".pdf"));
        assert!(!key.contains(".."));

        // Fresh UUID per call: keys never collide.
        let other = document_key(user_id, "Aadhar Card", "scan.pdf");
        assert_ne!(key, other);
    }
}
