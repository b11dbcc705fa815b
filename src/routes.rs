use crate::{
    middleware::auth_middleware,
    notification::notification_handlers,
    state::AppState,
    task::task_handlers,
    telegram::webhook,
    user::user_handlers,
};
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        task_handlers::create_task,
        task_handlers::list_tasks,
        task_handlers::withdraw_task,
        task_handlers::confirm_completion,
        user_handlers::get_professional,
        notification_handlers::get_notifications,
        notification_handlers::notification_stream,
        notification_handlers::mark_notification_read,
        notification_handlers::delete_notification,
        webhook::webhook_info,
        webhook::webhook,
    ),
    components(
        schemas(
            crate::task::task_dto::CreateTaskRequest,
            crate::task::task_dto::WithdrawRequest,
            crate::task::task_dto::ConfirmCompletionRequest,
            crate::task::task_dto::ConfirmationData,
            crate::task::task_dto::WithdrawResponse,
            crate::task::task_dto::ConfirmCompletionResponse,
            crate::task::Task,
            crate::task::TaskStatus,
            crate::task::TimingImpact,
            crate::task::RejectReason,
            crate::notification::Notification,
            crate::notification::NotificationType,
            crate::notification::DeliveryChannel,
            crate::user::user_models::ProfessionalProfile,
            crate::user::user_models::CompletedTaskSummary,
            crate::user::user_models::ReviewSummary,
        )
    ),
    tags(
        (name = "tasks", description = "Task lifecycle endpoints"),
        (name = "professionals", description = "Public professional profiles"),
        (name = "notifications", description = "Notification inbox endpoints"),
        (name = "telegram", description = "Telegram bot webhook")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Task routes authenticate per-handler: the list endpoint is public
    // except for mode=posted, and the mutation endpoints also accept
    // single-use notification deep-link tokens.
    let task_routes = Router::new()
        .route("/", get(task_handlers::list_tasks).post(task_handlers::create_task))
        .route("/:id/withdraw", post(task_handlers::withdraw_task))
        .route(
            "/:id/confirm-completion",
            post(task_handlers::confirm_completion),
        );

    let professional_routes =
        Router::new().route("/:id", get(user_handlers::get_professional));

    let notification_routes = Router::new()
        .route("/", get(notification_handlers::get_notifications))
        .route("/stream", get(notification_handlers::notification_stream))
        .route(
            "/:id/read",
            patch(notification_handlers::mark_notification_read),
        )
        .route("/:id", delete(notification_handlers::delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let telegram_routes = Router::new().route(
        "/webhook",
        get(webhook::webhook_info).post(webhook::webhook),
    );

    let api_routes = Router::new()
        .nest("/tasks", task_routes)
        .nest("/professionals", professional_routes)
        .nest("/notifications", notification_routes)
        .nest("/telegram", telegram_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
