//! Eligibility matching.
//!
//! A pure interpreter over the per-scheme criterion lists: a scheme qualifies
//! only if every criterion it carries passes against the profile. Criteria a
//! scheme does not carry are no constraint, while a profile attribute a
//! criterion needs but the profile lacks fails that criterion (fail-closed).
//!
//! Results are ordered by `success_rate` descending, then scheme id
//! ascending, so repeated calls with unchanged inputs yield identical output.

use chrono::NaiveDate;

use crate::models::{
    EligibilityCriterion, FlagField, NumericField, Scheme, SchemeStatus, TextField, UserProfile,
};

fn numeric_value(profile: &UserProfile, field: NumericField) -> Option<f64> {
    match field {
        NumericField::AnnualIncome => profile.annual_income.map(|v| v as f64),
        NumericField::Age => profile.age.map(f64::from),
        NumericField::FamilySize => profile.family_size.map(f64::from),
        NumericField::LandSizeHectares => profile.land_size_hectares,
        NumericField::DisabilityPercentage => profile.disability_percentage.map(f64::from),
    }
}

fn text_value(profile: &UserProfile, field: TextField) -> Option<&str> {
    match field {
        TextField::Location => profile.location.as_deref(),
        TextField::Sex => profile.sex.as_deref(),
        TextField::MaritalStatus => profile.marital_status.as_deref(),
        TextField::SocialCategory => profile.social_category.as_deref(),
        TextField::ResidenceType => profile.residence_type.as_deref(),
        TextField::EmploymentStatus => profile.employment_status.as_deref(),
    }
}

fn flag_value(profile: &UserProfile, field: FlagField) -> bool {
    match field {
        FlagField::Disability => profile.disability,
        FlagField::Minority => profile.minority,
        FlagField::Student => profile.student,
        FlagField::GovernmentEmployee => profile.government_employee,
    }
}

/// Evaluate a single criterion against a profile.
pub fn criterion_passes(profile: &UserProfile, criterion: &EligibilityCriterion) -> bool {
    match criterion {
        EligibilityCriterion::NumericRange { field, min, max } => {
            // Absent profile attribute fails the criterion.
            let Some(value) = numeric_value(profile, *field) else {
                return false;
            };
            if let Some(min) = min {
                if value < *min {
                    return false;
                }
            }
            if let Some(max) = max {
                if value > *max {
                    return false;
                }
            }
            true
        }
        EligibilityCriterion::SetMembership { field, allowed } => {
            // An empty allowed list is no constraint.
            if allowed.is_empty() {
                return true;
            }
            match text_value(profile, *field) {
                Some(value) => allowed.iter().any(|a| a.eq_ignore_ascii_case(value)),
                None => false,
            }
        }
        EligibilityCriterion::Flag { field, expected } => flag_value(profile, *field) == *expected,
    }
}

/// Whether a scheme qualifies for a profile: Active, deadline not passed,
/// and all present criteria pass. A scheme with no criteria qualifies for
/// every profile.
pub fn scheme_matches(profile: &UserProfile, scheme: &Scheme, today: NaiveDate) -> bool {
    if scheme.status != SchemeStatus::Active || !scheme.deadline.is_open_on(today) {
        return false;
    }
    scheme
        .criteria
        .iter()
        .all(|criterion| criterion_passes(profile, criterion))
}

/// Filter and rank the catalog for a profile.
///
/// Pure and deterministic: the same profile and catalog always produce the
/// same ordered result.
pub fn match_schemes<'a>(
    profile: &UserProfile,
    catalog: &'a [Scheme],
    today: NaiveDate,
) -> Vec<&'a Scheme> {
    let mut matched: Vec<&Scheme> = catalog
        .iter()
        .filter(|scheme| scheme_matches(profile, scheme, today))
        .collect();
    matched.sort_by(|a, b| {
        b.success_rate
            .total_cmp(&a.success_rate)
            .then_with(|| a.id.cmp(&b.id))
    });
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Deadline, DocumentType};
    use chrono::Utc;
    use uuid::Uuid;

    fn empty_profile() -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            phone_number: None,
            age: None,
            sex: None,
            marital_status: None,
            location: None,
            family_size: None,
            annual_income: None,
            residence_type: None,
            social_category: None,
            disability: false,
            disability_percentage: None,
            minority: false,
            student: false,
            employment_status: None,
            government_employee: false,
            land_size_hectares: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn scheme(id: i32, success_rate: f32, criteria: Vec<EligibilityCriterion>) -> Scheme {
        Scheme {
            id,
            name: format!("Scheme {}", id),
            description: "test scheme".to_string(),
            category: "Welfare".to_string(),
            benefit: "benefit".to_string(),
            criteria,
            required_documents: vec![DocumentType::AadharCard],
            status: SchemeStatus::Active,
            deadline: Deadline::Open,
            success_rate,
        }
    }

    fn max_income(amount: f64) -> EligibilityCriterion {
        EligibilityCriterion::NumericRange {
            field: NumericField::AnnualIncome,
            min: None,
            max: Some(amount),
        }
    }

    fn locations(allowed: &[&str]) -> EligibilityCriterion {
        EligibilityCriterion::SetMembership {
            field: TextField::Location,
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_income_and_location_criteria_combined() {
        let mut profile = empty_profile();
        profile.annual_income = Some(10_000);
        profile.location = Some("Madhya Pradesh".to_string());

        let catalog = vec![
            scheme(1, 0.5, vec![max_income(15_000.0), locations(&["Madhya Pradesh"])]),
            scheme(2, 0.5, vec![max_income(5_000.0)]),
        ];

        let matched = match_schemes(&profile, &catalog, today());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, 1);
    }

    #[test]
    fn test_empty_criteria_matches_every_profile() {
        let catalog = vec![scheme(1, 0.5, vec![])];
        let matched = match_schemes(&empty_profile(), &catalog, today());
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_empty_profile_fails_closed_per_criterion() {
        // Empty profile yields only the unconstrained schemes, not an empty list.
        let catalog = vec![
            scheme(1, 0.5, vec![]),
            scheme(2, 0.9, vec![max_income(1_000_000.0)]),
            scheme(3, 0.9, vec![locations(&["Bihar"])]),
        ];
        let matched = match_schemes(&empty_profile(), &catalog, today());
        assert_eq!(matched.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_empty_allowed_list_is_no_constraint() {
        let catalog = vec![scheme(1, 0.5, vec![locations(&[])])];
        let matched = match_schemes(&empty_profile(), &catalog, today());
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_set_membership_is_case_insensitive() {
        let mut profile = empty_profile();
        profile.location = Some("madhya pradesh".to_string());
        let catalog = vec![scheme(1, 0.5, vec![locations(&["Madhya Pradesh"])])];
        assert_eq!(match_schemes(&profile, &catalog, today()).len(), 1);
    }

    #[test]
    fn test_numeric_min_bound() {
        let age_range = EligibilityCriterion::NumericRange {
            field: NumericField::Age,
            min: Some(18.0),
            max: Some(40.0),
        };
        let catalog = vec![scheme(1, 0.5, vec![age_range])];

        let mut profile = empty_profile();
        profile.age = Some(17);
        assert!(match_schemes(&profile, &catalog, today()).is_empty());

        profile.age = Some(18);
        assert_eq!(match_schemes(&profile, &catalog, today()).len(), 1);

        profile.age = Some(41);
        assert!(match_schemes(&profile, &catalog, today()).is_empty());
    }

    #[test]
    fn test_flag_criterion() {
        let needs_student = EligibilityCriterion::Flag {
            field: FlagField::Student,
            expected: true,
        };
        let catalog = vec![scheme(1, 0.5, vec![needs_student])];

        let mut profile = empty_profile();
        assert!(match_schemes(&profile, &catalog, today()).is_empty());
        profile.student = true;
        assert_eq!(match_schemes(&profile, &catalog, today()).len(), 1);
    }

    #[test]
    fn test_closed_and_expired_schemes_never_match() {
        let mut closed = scheme(1, 0.5, vec![]);
        closed.status = SchemeStatus::Closed;

        let mut expired = scheme(2, 0.5, vec![]);
        expired.deadline = Deadline::Date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        let catalog = [closed, expired];
        let matched = match_schemes(&empty_profile(), &catalog, today());
        assert!(matched.is_empty());
    }

    #[test]
    fn test_ordering_success_rate_then_id() {
        let catalog = vec![
            scheme(3, 0.5, vec![]),
            scheme(1, 0.5, vec![]),
            scheme(2, 0.9, vec![]),
        ];
        let matched = match_schemes(&empty_profile(), &catalog, today());
        assert_eq!(matched.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn test_match_is_deterministic_and_idempotent() {
        let mut profile = empty_profile();
        profile.annual_income = Some(80_000);
        profile.location = Some("Bihar".to_string());

        let catalog = vec![
            scheme(5, 0.4, vec![max_income(100_000.0)]),
            scheme(2, 0.4, vec![locations(&["Bihar", "Odisha"])]),
            scheme(9, 0.8, vec![]),
        ];

        let first: Vec<i32> = match_schemes(&profile, &catalog, today())
            .iter()
            .map(|s| s.id)
            .collect();
        let second: Vec<i32> = match_schemes(&profile, &catalog, today())
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![9, 2, 5]);
    }
}
