use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Professional,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Customer => write!(f, "customer"),
            UserRole::Professional => write!(f, "professional"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub locale: String,
    pub bio: Option<String>,
    pub city: Option<String>,
    /// Per-notification-type overrides, e.g. `{"task_completed": {"telegram": false}}`.
    #[schema(value_type = Object)]
    pub notification_preferences: Option<serde_json::Value>,
    pub preferred_channel: String,
    pub telegram_chat_id: Option<i64>,
    pub telegram_username: Option<String>,
    pub telegram_first_name: Option<String>,
    pub telegram_last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public slice of a professional's profile, returned by `/api/professionals/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfessionalProfile {
    pub id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub member_since: String,
    pub completed_tasks: Vec<CompletedTaskSummary>,
    pub reviews: Vec<ReviewSummary>,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompletedTaskSummary {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub city: String,
    pub completed: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewSummary {
    pub rating: i32,
    pub comment: Option<String>,
    pub created: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Customer.to_string(), "customer");
        assert_eq!(UserRole::Professional.to_string(), "professional");
    }
}
