use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
    /// Terminal marker set when the task it was accepted for is confirmed
    /// complete, so the row is self-describing without a task join.
    Completed,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
            ApplicationStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// A professional's bid on a task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Application {
    pub id: Uuid,
    pub task_id: Uuid,
    pub professional_id: Uuid,
    pub proposed_price: Option<i32>,
    pub proposed_timeline: Option<String>,
    pub message: Option<String>,
    pub status: ApplicationStatus,
    pub accepted_at: Option<DateTime<Utc>>,
    pub withdrawn_at: Option<DateTime<Utc>>,
    /// Timing impact recorded at withdrawal time ('low'|'medium'|'high').
    pub withdrawal_impact: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_status_display() {
        assert_eq!(ApplicationStatus::Pending.to_string(), "pending");
        assert_eq!(ApplicationStatus::Withdrawn.to_string(), "withdrawn");
        assert_eq!(ApplicationStatus::Completed.to_string(), "completed");
    }
}
