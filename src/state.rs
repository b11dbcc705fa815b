use crate::auth::LoginTokenRepository;
use crate::notification::{Notification, NotificationRepository};
use crate::review::ReviewRepository;
use crate::task::{TaskRepository, TaskService};
use crate::telegram::{TelegramClient, TelegramTokenRepository};
use crate::user::UserRepository;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notification_tx: broadcast::Sender<(Uuid, Notification)>,
    pub user_repository: UserRepository,
    pub task_repository: TaskRepository,
    pub review_repository: ReviewRepository,
    pub notification_repository: NotificationRepository,
    pub login_token_repository: LoginTokenRepository,
    pub telegram_token_repository: TelegramTokenRepository,
    pub telegram_client: TelegramClient,
    pub task_service: TaskService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub site_url: String,
    pub telegram_bot_token: String,
    pub telegram_webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            site_url: std::env::var("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .expect("SITE_URL must be set"),
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .expect("TELEGRAM_BOT_TOKEN must be set"),
            telegram_webhook_secret: std::env::var("TELEGRAM_WEBHOOK_SECRET").ok(),
        }
    }
}
