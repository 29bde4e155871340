use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::document::DocumentType;

/// Profile attribute referenced by a numeric range criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    AnnualIncome,
    Age,
    FamilySize,
    LandSizeHectares,
    DisabilityPercentage,
}

/// Profile attribute referenced by a set membership criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Location,
    Sex,
    MaritalStatus,
    SocialCategory,
    ResidenceType,
    EmploymentStatus,
}

/// Boolean profile attribute referenced by a flag criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagField {
    Disability,
    Minority,
    Student,
    GovernmentEmployee,
}

/// One eligibility constraint. Criteria shape varies per scheme, so a scheme
/// carries an arbitrary list of these; a scheme with an empty list has no
/// constraints at all.
///
/// Evaluation semantics live in [`crate::eligibility`]: numeric ranges and
/// set membership are fail-closed when the profile attribute is absent, and
/// an empty `allowed` list means "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EligibilityCriterion {
    NumericRange {
        field: NumericField,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    SetMembership {
        field: TextField,
        #[serde(default)]
        allowed: Vec<String>,
    },
    Flag {
        field: FlagField,
        expected: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SchemeStatus {
    Active,
    Closed,
}

/// Application deadline: a calendar date or the "Open" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Deadline {
    Date(NaiveDate),
    Open,
}

impl Deadline {
    /// Whether applications are still accepted on `today`.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        match self {
            Deadline::Open => true,
            Deadline::Date(date) => today <= *date,
        }
    }
}

impl TryFrom<String> for Deadline {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "Open" {
            return Ok(Deadline::Open);
        }
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Deadline::Date)
            .map_err(|e| format!("Invalid deadline {:?}: {}", value, e))
    }
}

impl From<Deadline> for String {
    fn from(deadline: Deadline) -> Self {
        match deadline {
            Deadline::Open => "Open".to_string(),
            Deadline::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Immutable welfare scheme catalog entry. Loaded once at process start and
/// shared read-only; never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Scheme {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub benefit: String,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub criteria: Vec<EligibilityCriterion>,
    #[serde(default)]
    pub required_documents: Vec<DocumentType>,
    pub status: SchemeStatus,
    #[schema(value_type = String, example = "2026-12-31")]
    pub deadline: Deadline,
    /// Ranking metadata in [0,1]; higher ranks first in match results.
    pub success_rate: f32,
}

/// Compact scheme reference embedded in application listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SchemeSummary {
    pub id: i32,
    pub name: String,
    pub category: String,
}

impl From<&Scheme> for SchemeSummary {
    fn from(scheme: &Scheme) -> Self {
        SchemeSummary {
            id: scheme.id,
            name: scheme.name.clone(),
            category: scheme.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_parsing() {
        let open: Deadline = serde_json::from_str("\"Open\"").unwrap();
        assert_eq!(open, Deadline::Open);

        let dated: Deadline = serde_json::from_str("\"2026-12-31\"").unwrap();
        assert_eq!(
            dated,
            Deadline::Date(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap())
        );

        assert!(serde_json::from_str::<Deadline>("\"whenever\"").is_err());
    }

    #[test]
    fn test_deadline_is_open_on() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let deadline = Deadline::Date(date);
        assert!(deadline.is_open_on(date));
        assert!(deadline.is_open_on(date.pred_opt().unwrap()));
        assert!(!deadline.is_open_on(date.succ_opt().unwrap()));
        assert!(Deadline::Open.is_open_on(date));
    }

    #[test]
    fn test_criterion_json_shape() {
        let json = r#"{
            "kind": "numeric_range",
            "field": "annual_income",
            "max": 150000.0
        }"#;
        let criterion: EligibilityCriterion = serde_json::from_str(json).unwrap();
        assert_eq!(
            criterion,
            EligibilityCriterion::NumericRange {
                field: NumericField::AnnualIncome,
                min: None,
                max: Some(150000.0),
            }
        );

        let json = r#"{
            "kind": "set_membership",
            "field": "location",
            "allowed": ["Madhya Pradesh", "Bihar"]
        }"#;
        let criterion: EligibilityCriterion = serde_json::from_str(json).unwrap();
        match criterion {
            EligibilityCriterion::SetMembership { field, allowed } => {
                assert_eq!(field, TextField::Location);
                assert_eq!(allowed.len(), 2);
            }
            other => panic!("unexpected criterion: {:?}", other),
        }
    }

    #[test]
    fn test_deadline_round_trip() {
        for raw in ["Open", "2026-03-31"] {
            let deadline: Deadline = serde_json::from_str(&format!("\"{}\"", raw)).unwrap();
            let back = serde_json::to_string(&deadline).unwrap();
            assert_eq!(back, format!("\"{}\"", raw));
        }
    }
}
