mod application;
mod auth;
mod db;
mod error;
mod i18n;
mod middleware;
mod moderation;
mod notification;
mod review;
mod routes;
mod state;
mod task;
mod telegram;
mod user;

use application::ApplicationRepository;
use auth::LoginTokenRepository;
use db::{create_pool, run_migrations};
use notification::{NotificationRepository, NotificationRouter, RoutingTable};
use review::ReviewRepository;
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use task::{TaskRepository, TaskService};
use telegram::{TelegramClient, TelegramTokenRepository};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::UserRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,trudify=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // In-app notification broadcaster for SSE subscribers
    let (notification_tx, _) = broadcast::channel(100);

    // Create repositories
    let user_repository = UserRepository::new(db.clone());
    let task_repository = TaskRepository::new(db.clone());
    let application_repository = ApplicationRepository::new(db.clone());
    let review_repository = ReviewRepository::new(db.clone());
    let notification_repository = NotificationRepository::new(db.clone());
    let login_token_repository = LoginTokenRepository::new(db.clone());
    let telegram_token_repository = TelegramTokenRepository::new(db.clone());

    let telegram_client = TelegramClient::new(config.telegram_bot_token.clone())?;

    // Create services
    let notification_router = NotificationRouter::new(
        user_repository.clone(),
        notification_repository.clone(),
        login_token_repository.clone(),
        telegram_client.clone(),
        RoutingTable::new(),
        config.site_url.clone(),
        notification_tx.clone(),
    );
    let task_service = TaskService::new(
        task_repository.clone(),
        application_repository.clone(),
        review_repository.clone(),
        user_repository.clone(),
        notification_router.clone(),
    );

    // Create application state
    let state = AppState {
        config: config.clone(),
        notification_tx: notification_tx.clone(),
        user_repository,
        task_repository,
        review_repository,
        notification_repository,
        login_token_repository,
        telegram_token_repository,
        telegram_client,
        task_service,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
