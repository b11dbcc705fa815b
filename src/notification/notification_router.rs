use super::notification_models::{
    DeliveryChannel, Notification, NotificationType, RoutingTable, TemplateData,
};
use super::notification_repository::NotificationRepository;
use super::templates;
use crate::auth::LoginTokenRepository;
use crate::i18n::Locale;
use crate::telegram::TelegramClient;
use crate::user::user_models::User;
use crate::user::user_repository::UserRepository;
use tokio::sync::broadcast;
use uuid::Uuid;

/// One delivery request. Only `user_id` and `notification_type` are
/// mandatory; everything else falls back to routing defaults, the user's
/// stored preferences, or the localized templates.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: Option<String>,
    pub message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub action_url: Option<String>,
    pub delivery_channel: Option<DeliveryChannel>,
    pub locale: Option<Locale>,
    pub template_data: Option<TemplateData>,
}

impl NotificationRequest {
    pub fn new(user_id: Uuid, notification_type: NotificationType) -> Self {
        Self {
            user_id,
            notification_type,
            title: None,
            message: None,
            metadata: None,
            action_url: None,
            delivery_channel: None,
            locale: None,
            template_data: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramDelivery {
    NotAttempted,
    Sent,
    Failed,
}

/// Outcome of a delivery attempt. "Success" means the inbox row exists;
/// external delivery is reported separately and is always best-effort.
#[derive(Debug, Clone)]
pub struct NotificationOutcome {
    pub success: bool,
    pub notification_id: Option<Uuid>,
    pub channel: Option<DeliveryChannel>,
    pub telegram: TelegramDelivery,
    pub error: Option<String>,
}

impl NotificationOutcome {
    fn skipped(error: impl Into<String>) -> Self {
        Self {
            success: false,
            notification_id: None,
            channel: None,
            telegram: TelegramDelivery::NotAttempted,
            error: Some(error.into()),
        }
    }
}

/// Resolves the delivery channel: an explicit caller choice wins outright;
/// otherwise the routing-table default is adjusted by the user's per-type
/// `telegram` preference.
pub fn resolve_channel(
    routing: &RoutingTable,
    notification_type: NotificationType,
    preferences: Option<&serde_json::Value>,
    explicit: Option<DeliveryChannel>,
) -> DeliveryChannel {
    if let Some(channel) = explicit {
        return channel;
    }

    let default = routing.default_channel(notification_type);
    let telegram_pref = preferences
        .and_then(|p| p.get(notification_type.as_str()))
        .and_then(|t| t.get("telegram"))
        .and_then(|v| v.as_bool());

    match telegram_pref {
        Some(true) => match default {
            DeliveryChannel::InApp => DeliveryChannel::Both,
            other => other,
        },
        Some(false) => DeliveryChannel::InApp,
        None => default,
    }
}

/// Routes one event to the user's inbox and, when the resolved channel calls
/// for it, to their linked Telegram chat. The inserted notification row is
/// the single truth of success; the external send and the follow-up status
/// update are each caught independently so no side effect can fail the
/// triggering business operation.
#[derive(Clone)]
pub struct NotificationRouter {
    users: UserRepository,
    notifications: NotificationRepository,
    login_tokens: LoginTokenRepository,
    telegram: TelegramClient,
    routing: RoutingTable,
    site_url: String,
    notification_tx: broadcast::Sender<(Uuid, Notification)>,
}

impl NotificationRouter {
    pub fn new(
        users: UserRepository,
        notifications: NotificationRepository,
        login_tokens: LoginTokenRepository,
        telegram: TelegramClient,
        routing: RoutingTable,
        site_url: String,
        notification_tx: broadcast::Sender<(Uuid, Notification)>,
    ) -> Self {
        Self {
            users,
            notifications,
            login_tokens,
            telegram,
            routing,
            site_url,
            notification_tx,
        }
    }

    pub async fn notify(&self, request: NotificationRequest) -> NotificationOutcome {
        let user = match self.users.find_by_id(request.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(user_id = %request.user_id, "Notification target does not exist");
                return NotificationOutcome::skipped("user not found");
            }
            Err(e) => {
                tracing::error!(user_id = %request.user_id, error = %e, "User lookup failed");
                return NotificationOutcome::skipped("user lookup failed");
            }
        };

        let channel = resolve_channel(
            &self.routing,
            request.notification_type,
            user.notification_preferences.as_ref(),
            request.delivery_channel,
        );

        let locale = request
            .locale
            .unwrap_or_else(|| Locale::parse_or_default(Some(user.locale.as_str())));

        let template_data = request.template_data.clone().unwrap_or_default();
        let (title, message) =
            match templates::render(request.notification_type, locale, &template_data) {
                Some(rendered) => (rendered.title, rendered.message),
                None => match (request.title.clone(), request.message.clone()) {
                    (Some(title), Some(message)) if !title.is_empty() && !message.is_empty() => {
                        (title, message)
                    }
                    _ => {
                        tracing::warn!(
                            notification_type = %request.notification_type,
                            "No template and no caller-supplied content"
                        );
                        return NotificationOutcome::skipped("missing notification content");
                    }
                },
            };

        let action_url = match request.action_url.as_deref() {
            Some(path) => Some(self.build_deep_link(user.id, locale, path).await),
            None => None,
        };

        let notification = match self
            .notifications
            .create(
                user.id,
                request.notification_type,
                &title,
                &message,
                request.metadata.as_ref(),
                action_url.as_deref(),
                channel,
            )
            .await
        {
            Ok(notification) => notification,
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to insert notification");
                return NotificationOutcome::skipped("notification insert failed");
            }
        };

        // Inbox stream for connected SSE clients.
        let _ = self
            .notification_tx
            .send((user.id, notification.clone()));

        let telegram = if channel.includes_telegram() {
            self.deliver_telegram(&user, &notification, locale, &template_data)
                .await
        } else {
            TelegramDelivery::NotAttempted
        };

        NotificationOutcome {
            success: true,
            notification_id: Some(notification.id),
            channel: Some(channel),
            telegram,
            error: None,
        }
    }

    /// Locale-prefixed single-use auto-login URL; falls back to the plain
    /// locale-prefixed URL when token issuance fails.
    async fn build_deep_link(&self, user_id: Uuid, locale: Locale, path: &str) -> String {
        match self.login_tokens.create(user_id).await {
            Ok(token) => format!("{}/{}{}?auth_token={}", self.site_url, locale, path, token),
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "Auto-login token issuance failed");
                format!("{}/{}{}", self.site_url, locale, path)
            }
        }
    }

    async fn deliver_telegram(
        &self,
        user: &User,
        notification: &Notification,
        locale: Locale,
        template_data: &TemplateData,
    ) -> TelegramDelivery {
        let Some(chat_id) = user.telegram_chat_id else {
            return TelegramDelivery::NotAttempted;
        };

        let text = templates::render_telegram(notification.notification_type, locale, template_data)
            .unwrap_or_else(|| {
                format!("<b>{}</b>\n\n{}", notification.title, notification.message)
            });

        let status = match self.telegram.send_message(chat_id, &text).await {
            Ok(()) => TelegramDelivery::Sent,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Telegram delivery failed");
                TelegramDelivery::Failed
            }
        };

        let status_str = match status {
            TelegramDelivery::Sent => "sent",
            _ => "failed",
        };
        if let Err(e) = self
            .notifications
            .record_telegram_delivery(notification.id, status_str)
            .await
        {
            tracing::warn!(notification_id = %notification.id, error = %e, "Failed to record Telegram delivery status");
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_channel_wins() {
        let routing = RoutingTable::new();
        let prefs = json!({ "task_completed": { "telegram": false } });
        assert_eq!(
            resolve_channel(
                &routing,
                NotificationType::TaskCompleted,
                Some(&prefs),
                Some(DeliveryChannel::Both),
            ),
            DeliveryChannel::Both
        );
    }

    #[test]
    fn test_default_applies_without_preferences() {
        let routing = RoutingTable::new();
        assert_eq!(
            resolve_channel(&routing, NotificationType::TaskCompleted, None, None),
            DeliveryChannel::Both
        );
        assert_eq!(
            resolve_channel(&routing, NotificationType::NewApplication, None, None),
            DeliveryChannel::InApp
        );
    }

    #[test]
    fn test_opt_out_downgrades_to_in_app() {
        let routing = RoutingTable::new();
        let prefs = json!({ "task_completed": { "telegram": false } });
        assert_eq!(
            resolve_channel(&routing, NotificationType::TaskCompleted, Some(&prefs), None),
            DeliveryChannel::InApp
        );
    }

    #[test]
    fn test_opt_in_upgrades_in_app_default() {
        let routing = RoutingTable::new();
        let prefs = json!({ "new_application": { "telegram": true } });
        assert_eq!(
            resolve_channel(&routing, NotificationType::NewApplication, Some(&prefs), None),
            DeliveryChannel::Both
        );
    }

    #[test]
    fn test_unrelated_preference_is_ignored() {
        let routing = RoutingTable::new();
        let prefs = json!({ "welcome": { "telegram": false } });
        assert_eq!(
            resolve_channel(&routing, NotificationType::TaskCompleted, Some(&prefs), None),
            DeliveryChannel::Both
        );
    }
}
