//! Scheme catalog.
//!
//! The catalog is loaded once at process start - from the embedded default
//! data or from a JSON file configured by the operator - and shared
//! read-only for the lifetime of the process. A managed store would replace
//! this in a larger deployment; runtime mutation is deliberately impossible.

use std::collections::HashSet;
use std::path::Path;

use crate::error::AppError;
use crate::models::Scheme;

/// Catalog bundled into the binary.
const DEFAULT_CATALOG_JSON: &str = include_str!("../data/schemes.json");

/// Immutable set of welfare schemes with eligibility criteria and metadata.
#[derive(Debug, Clone)]
pub struct SchemeCatalog {
    schemes: Vec<Scheme>,
}

impl SchemeCatalog {
    /// Load the embedded default catalog.
    pub fn load_default() -> Result<Self, AppError> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    /// Load a catalog from a JSON file path (operator override).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Internal(format!(
                "Failed to read scheme catalog {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let schemes: Vec<Scheme> = serde_json::from_str(raw)
            .map_err(|e| AppError::Internal(format!("Invalid scheme catalog: {}", e)))?;
        Self::new(schemes)
    }

    pub fn new(schemes: Vec<Scheme>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for scheme in &schemes {
            if !seen.insert(scheme.id) {
                return Err(AppError::Internal(format!(
                    "Duplicate scheme id in catalog: {}",
                    scheme.id
                )));
            }
            if !(0.0..=1.0).contains(&scheme.success_rate) {
                return Err(AppError::Internal(format!(
                    "Scheme {} success_rate out of range: {}",
                    scheme.id, scheme.success_rate
                )));
            }
        }
        Ok(SchemeCatalog { schemes })
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn get(&self, id: i32) -> Option<&Scheme> {
        self.schemes.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Deadline, SchemeStatus};

    #[test]
    fn test_default_catalog_loads() {
        let catalog = SchemeCatalog::load_default().unwrap();
        assert!(catalog.len() >= 10);
        assert!(catalog.get(1).is_some());
        assert!(catalog.get(0).is_none());
    }

    #[test]
    fn test_default_catalog_entries_are_well_formed() {
        let catalog = SchemeCatalog::load_default().unwrap();
        for scheme in catalog.schemes() {
            assert!(!scheme.name.is_empty());
            assert!(!scheme.required_documents.is_empty(), "scheme {}", scheme.id);
            assert!((0.0..=1.0).contains(&scheme.success_rate));
            assert_eq!(scheme.status, SchemeStatus::Active);
        }
        // The catalog carries both dated and open deadlines.
        assert!(catalog
            .schemes()
            .iter()
            .any(|s| s.deadline == Deadline::Open));
        assert!(catalog
            .schemes()
            .iter()
            .any(|s| matches!(s.deadline, Deadline::Date(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"[
            {"id": 1, "name": "A", "description": "d", "category": "c", "benefit": "b",
             "status": "Active", "deadline": "Open", "success_rate": 0.5},
            {"id": 1, "name": "B", "description": "d", "category": "c", "benefit": "b",
             "status": "Active", "deadline": "Open", "success_rate": 0.5}
        ]"#;
        assert!(SchemeCatalog::from_json(raw).is_err());
    }

    #[test]
    fn test_out_of_range_success_rate_rejected() {
        let raw = r#"[
            {"id": 1, "name": "A", "description": "d", "category": "c", "benefit": "b",
             "status": "Active", "deadline": "Open", "success_rate": 1.5}
        ]"#;
        assert!(SchemeCatalog::from_json(raw).is_err());
    }
}
