use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    PendingCustomerConfirmation,
    Completed,
    Cancelled,
    Expired,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::PendingCustomerConfirmation => "pending_customer_confirmation",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How disruptive a withdrawal was, based on time since acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimingImpact {
    Low,
    Medium,
    High,
}

impl TimingImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimingImpact::Low => "low",
            TimingImpact::Medium => "medium",
            TimingImpact::High => "high",
        }
    }
}

/// Closed set of reasons a customer may give when rejecting a completion
/// claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotCompleted,
    PoorQuality,
    DifferentScope,
    Other,
}

impl RejectReason {
    pub fn parse(s: &str) -> Option<RejectReason> {
        match s {
            "not_completed" => Some(RejectReason::NotCompleted),
            "poor_quality" => Some(RejectReason::PoorQuality),
            "different_scope" => Some(RejectReason::DifferentScope),
            "other" => Some(RejectReason::Other),
            _ => None,
        }
    }

    /// Human-readable mapping included in the professional's notification.
    pub fn label(&self, locale: crate::i18n::Locale) -> &'static str {
        use crate::i18n::Locale;
        match (self, locale) {
            (RejectReason::NotCompleted, Locale::Bg) => "работата не е завършена",
            (RejectReason::NotCompleted, Locale::En) => "the work is not completed",
            (RejectReason::NotCompleted, Locale::Ru) => "работа не завершена",
            (RejectReason::NotCompleted, Locale::Uk) => "роботу не завершено",
            (RejectReason::PoorQuality, Locale::Bg) => "незадоволително качество",
            (RejectReason::PoorQuality, Locale::En) => "unsatisfactory quality",
            (RejectReason::PoorQuality, Locale::Ru) => "неудовлетворительное качество",
            (RejectReason::PoorQuality, Locale::Uk) => "незадовільна якість",
            (RejectReason::DifferentScope, Locale::Bg) => "свършеното се разминава с договореното",
            (RejectReason::DifferentScope, Locale::En) => "the work differs from what was agreed",
            (RejectReason::DifferentScope, Locale::Ru) => "работа отличается от согласованной",
            (RejectReason::DifferentScope, Locale::Uk) => "робота відрізняється від узгодженої",
            (RejectReason::Other, Locale::Bg) => "друга причина",
            (RejectReason::Other, Locale::En) => "other reason",
            (RejectReason::Other, Locale::Ru) => "другая причина",
            (RejectReason::Other, Locale::Uk) => "інша причина",
        }
    }
}

/// A unit of work posted by a customer. `selected_professional_id` is set
/// while the task is assigned (in_progress through completed) and null while
/// it is open for applications.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub budget_min: Option<i32>,
    pub budget_max: Option<i32>,
    pub budget_type: Option<String>,
    pub requirements: Option<String>,
    pub status: TaskStatus,
    pub selected_professional_id: Option<Uuid>,
    pub completed_by_professional_at: Option<DateTime<Utc>>,
    pub confirmed_by_customer_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    #[test]
    fn test_task_status_display() {
        assert_eq!(TaskStatus::Open.to_string(), "open");
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            TaskStatus::PendingCustomerConfirmation.to_string(),
            "pending_customer_confirmation"
        );
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_reject_reason_parse() {
        assert_eq!(RejectReason::parse("not_completed"), Some(RejectReason::NotCompleted));
        assert_eq!(RejectReason::parse("poor_quality"), Some(RejectReason::PoorQuality));
        assert_eq!(RejectReason::parse("different_scope"), Some(RejectReason::DifferentScope));
        assert_eq!(RejectReason::parse("other"), Some(RejectReason::Other));
        assert_eq!(RejectReason::parse("nope"), None);
    }

    #[test]
    fn test_reject_reason_labels_exist_for_all_locales() {
        for reason in [
            RejectReason::NotCompleted,
            RejectReason::PoorQuality,
            RejectReason::DifferentScope,
            RejectReason::Other,
        ] {
            for locale in [Locale::Bg, Locale::En, Locale::Ru, Locale::Uk] {
                assert!(!reason.label(locale).is_empty());
            }
        }
    }
}
