use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::task_dto::{
    ConfirmCompletionRequest, ConfirmCompletionResponse, CreateTaskRequest, PaginatedResponse,
    WithdrawRequest, WithdrawResponse,
};
use super::task_models::{RejectReason, Task};
use super::task_service::ConfirmDecision;
use crate::{
    error::{AppError, Result},
    middleware::authenticate_request,
    moderation,
    state::AppState,
    task::task_repository::TaskFilters,
};

const FEATURED_LIMIT: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    mode: Option<String>,
    featured: Option<bool>,
    category: Option<String>,
    city: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Validation failure or blocked content"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    let user_id = authenticate_request(&state, &headers, query.as_deref()).await?;

    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(word) = moderation::screen_fields(&[
        Some(payload.title.as_str()),
        Some(payload.description.as_str()),
        payload.requirements.as_deref(),
    ]) {
        tracing::info!(%user_id, word, "Task rejected by profanity screen");
        return Err(AppError::Moderation(
            "Task text contains inappropriate language".to_string(),
        ));
    }

    let task = state.task_repository.create(user_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(
        ("mode" = Option<String>, Query, description = "posted (auth, caller's tasks) or applications (stub)"),
        ("featured" = Option<bool>, Query, description = "Curated front-page set"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("city" = Option<String>, Query, description = "Filter by city"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("limit" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "List of tasks"),
        (status = 401, description = "Unauthorized (mode=posted only)")
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<TaskListParams>,
) -> Result<Response> {
    if params.featured.unwrap_or(false) {
        let tasks = state.task_repository.find_featured(FEATURED_LIMIT).await?;
        return Ok(Json(tasks).into_response());
    }

    match params.mode.as_deref() {
        Some("posted") => {
            let user_id = authenticate_request(&state, &headers, raw_query.as_deref()).await?;
            let tasks = state.task_repository.find_posted_by(user_id).await?;
            Ok(Json(tasks).into_response())
        }
        // Listing the caller's applications is not wired up yet; clients get
        // an empty list rather than an error.
        Some("applications") => Ok(Json(Vec::<Task>::new()).into_response()),
        _ => {
            let page = params.page.unwrap_or(1).max(1);
            let limit = params.limit.unwrap_or(20).clamp(1, 100);

            let (tasks, total) = state
                .task_repository
                .find_open(TaskFilters {
                    category: params.category,
                    city: params.city,
                    page: Some(page),
                    limit: Some(limit),
                })
                .await?;

            let total_pages = (total as f64 / limit as f64).ceil() as u32;

            Ok(Json(PaginatedResponse {
                data: tasks,
                total,
                page,
                limit,
                total_pages,
            })
            .into_response())
        }
    }
}

/// Professional withdraws from an in-progress task
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/withdraw",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Task reopened", body = WithdrawResponse),
        (status = 400, description = "Missing reason or wrong task state"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the assigned professional"),
        (status = 404, description = "Task or application not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn withdraw_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Json(payload): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>> {
    let user_id = authenticate_request(&state, &headers, query.as_deref()).await?;

    let reason = payload
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation("Withdrawal reason is required".to_string()))?;

    let outcome = state
        .task_service
        .withdraw(task_id, user_id, reason, payload.description.as_deref())
        .await?;

    tracing::debug!(%task_id, side_effects = ?outcome.side_effects, "Withdrawal processed");

    Ok(Json(WithdrawResponse {
        success: true,
        task: outcome.task,
        timing_impact: outcome.timing_impact,
        withdrawals_this_month: outcome.withdrawals_this_month,
    }))
}

/// Customer confirms or rejects a completion claim
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/confirm-completion",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = ConfirmCompletionRequest,
    responses(
        (status = 200, description = "Transition applied", body = ConfirmCompletionResponse),
        (status = 400, description = "Invalid action/reason or wrong task state"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the task owner"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn confirm_completion(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Json(payload): Json<ConfirmCompletionRequest>,
) -> Result<Json<ConfirmCompletionResponse>> {
    let user_id = authenticate_request(&state, &headers, query.as_deref()).await?;

    let decision = match payload.action.as_str() {
        "confirm" => {
            let (rating, review_text) = match payload.confirmation_data {
                Some(data) => (data.rating, data.review_text),
                None => (None, None),
            };

            if let Some(rating) = rating {
                if !(1..=5).contains(&rating) {
                    return Err(AppError::Validation(
                        "Rating must be between 1 and 5".to_string(),
                    ));
                }
            }

            ConfirmDecision::Confirm {
                rating,
                review_text,
            }
        }
        "reject" => {
            let reason = payload
                .reason
                .as_deref()
                .and_then(RejectReason::parse)
                .ok_or_else(|| {
                    AppError::Validation(
                        "A rejection reason (not_completed, poor_quality, different_scope, other) is required"
                            .to_string(),
                    )
                })?;

            ConfirmDecision::Reject { reason }
        }
        other => {
            return Err(AppError::Validation(format!(
                "Invalid action '{}': expected 'confirm' or 'reject'",
                other
            )));
        }
    };

    let outcome = state
        .task_service
        .confirm_completion(task_id, user_id, decision)
        .await?;

    tracing::debug!(%task_id, side_effects = ?outcome.side_effects, "Completion decision processed");

    Ok(Json(ConfirmCompletionResponse {
        success: true,
        task: outcome.task,
    }))
}
