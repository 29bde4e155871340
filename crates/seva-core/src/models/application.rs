use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

use super::scheme::SchemeSummary;

/// Application review lifecycle. Pending is initial; Approved and Rejected
/// are terminal. The status is changed only by a reviewing actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Only pending -> approved and pending -> rejected are allowed.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (
                ApplicationStatus::Pending,
                ApplicationStatus::Approved | ApplicationStatus::Rejected
            )
        )
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(AppError::InvalidInput(format!(
                "Unknown application status: {}",
                other
            ))),
        }
    }
}

/// A user's submitted intent to receive benefits under a scheme.
/// Never deleted; status moves from pending to a terminal state exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub scheme_id: i32,
    pub status: ApplicationStatus,
    pub document_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApplicationRequest {
    #[serde(alias = "schemeId")]
    pub scheme_id: i32,
    /// Document record IDs attached to this application.
    #[serde(default)]
    pub documents: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub scheme_id: i32,
    /// Resolved from the catalog; absent if the catalog entry was retired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<SchemeSummary>,
    pub status: ApplicationStatus,
    pub document_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationResponse {
    pub fn from_application(application: Application, scheme: Option<SchemeSummary>) -> Self {
        ApplicationResponse {
            id: application.id,
            scheme_id: application.scheme_id,
            scheme,
            status: application.status,
            document_ids: application.document_ids,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Approved));
        assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Rejected));

        // Terminal states never transition, and pending cannot loop to itself.
        assert!(!ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Pending));
        assert!(!ApplicationStatus::Approved.can_transition_to(ApplicationStatus::Rejected));
        assert!(!ApplicationStatus::Approved.can_transition_to(ApplicationStatus::Pending));
        assert!(!ApplicationStatus::Rejected.can_transition_to(ApplicationStatus::Approved));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("withdrawn".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: ApplicationStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Approved);
    }
}
