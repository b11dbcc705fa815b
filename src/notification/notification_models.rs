use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Closed set of notification event types. Template resolution and channel
/// routing both match exhaustively on this enum, so adding a variant forces
/// every table to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Welcome,
    NewApplication,
    ApplicationAccepted,
    ApplicationRejected,
    TaskCompleted,
    CompletionRejected,
    ProfessionalWithdrew,
    PaymentConfirmed,
    DeadlineReminder,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Welcome => "welcome",
            NotificationType::NewApplication => "new_application",
            NotificationType::ApplicationAccepted => "application_accepted",
            NotificationType::ApplicationRejected => "application_rejected",
            NotificationType::TaskCompleted => "task_completed",
            NotificationType::CompletionRejected => "completion_rejected",
            NotificationType::ProfessionalWithdrew => "professional_withdrew",
            NotificationType::PaymentConfirmed => "payment_confirmed",
            NotificationType::DeadlineReminder => "deadline_reminder",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    InApp,
    Telegram,
    Both,
}

impl DeliveryChannel {
    pub fn includes_telegram(&self) -> bool {
        matches!(self, DeliveryChannel::Telegram | DeliveryChannel::Both)
    }

    pub fn includes_in_app(&self) -> bool {
        matches!(self, DeliveryChannel::InApp | DeliveryChannel::Both)
    }
}

/// Per-type default channel map, passed to the router at construction so
/// deployments and tests can override individual entries.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    defaults: std::collections::HashMap<NotificationType, DeliveryChannel>,
}

impl RoutingTable {
    /// Critical event types default to both channels; everything else stays
    /// in the in-app inbox unless the user opted in.
    pub fn new() -> Self {
        let mut defaults = std::collections::HashMap::new();
        for critical in [
            NotificationType::ApplicationAccepted,
            NotificationType::PaymentConfirmed,
            NotificationType::TaskCompleted,
            NotificationType::Welcome,
            NotificationType::DeadlineReminder,
        ] {
            defaults.insert(critical, DeliveryChannel::Both);
        }
        for routine in [
            NotificationType::NewApplication,
            NotificationType::ApplicationRejected,
            NotificationType::CompletionRejected,
            NotificationType::ProfessionalWithdrew,
        ] {
            defaults.insert(routine, DeliveryChannel::InApp);
        }
        Self { defaults }
    }

    pub fn with_channel(
        mut self,
        notification_type: NotificationType,
        channel: DeliveryChannel,
    ) -> Self {
        self.defaults.insert(notification_type, channel);
        self
    }

    pub fn default_channel(&self, notification_type: NotificationType) -> DeliveryChannel {
        self.defaults
            .get(&notification_type)
            .copied()
            .unwrap_or(DeliveryChannel::InApp)
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
    pub action_url: Option<String>,
    pub delivery_channel: DeliveryChannel,
    /// 'sent' doubles as the unread marker for the inbox view.
    pub state: String,
    pub telegram_sent_at: Option<DateTime<Utc>>,
    pub telegram_delivery_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values interpolated into the localized templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TemplateData {
    pub task_title: Option<String>,
    pub counterpart_name: Option<String>,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_strings() {
        assert_eq!(NotificationType::TaskCompleted.as_str(), "task_completed");
        assert_eq!(
            NotificationType::ProfessionalWithdrew.to_string(),
            "professional_withdrew"
        );
    }

    #[test]
    fn test_critical_types_default_to_both() {
        let table = RoutingTable::new();
        for critical in [
            NotificationType::ApplicationAccepted,
            NotificationType::PaymentConfirmed,
            NotificationType::TaskCompleted,
            NotificationType::Welcome,
            NotificationType::DeadlineReminder,
        ] {
            assert_eq!(table.default_channel(critical), DeliveryChannel::Both);
        }
    }

    #[test]
    fn test_other_types_default_to_in_app() {
        let table = RoutingTable::new();
        for routine in [
            NotificationType::NewApplication,
            NotificationType::ApplicationRejected,
            NotificationType::CompletionRejected,
            NotificationType::ProfessionalWithdrew,
        ] {
            assert_eq!(table.default_channel(routine), DeliveryChannel::InApp);
        }
    }

    #[test]
    fn test_routing_override() {
        let table = RoutingTable::new()
            .with_channel(NotificationType::NewApplication, DeliveryChannel::Both);
        assert_eq!(
            table.default_channel(NotificationType::NewApplication),
            DeliveryChannel::Both
        );
        // Untouched entries keep their defaults.
        assert_eq!(
            table.default_channel(NotificationType::ApplicationRejected),
            DeliveryChannel::InApp
        );
    }

    #[test]
    fn test_channel_membership() {
        assert!(DeliveryChannel::Both.includes_telegram());
        assert!(DeliveryChannel::Both.includes_in_app());
        assert!(!DeliveryChannel::InApp.includes_telegram());
        assert!(!DeliveryChannel::Telegram.includes_in_app());
    }
}
