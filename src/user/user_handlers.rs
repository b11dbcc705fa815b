use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::user_models::{CompletedTaskSummary, ProfessionalProfile, ReviewSummary, UserRole};
use crate::{
    error::{AppError, Result},
    i18n::{format_relative, Locale},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    locale: Option<String>,
}

/// Public professional profile with completed-task history and reviews
#[utoipa::path(
    get,
    path = "/api/professionals/{id}",
    params(
        ("id" = Uuid, Path, description = "Professional's user ID"),
        ("locale" = Option<String>, Query, description = "Locale for relative dates (bg default)")
    ),
    responses(
        (status = 200, description = "Professional profile", body = ProfessionalProfile),
        (status = 404, description = "Professional not found")
    ),
    tag = "professionals"
)]
pub async fn get_professional(
    State(state): State<AppState>,
    Path(professional_id): Path<Uuid>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<ProfessionalProfile>> {
    let user = state
        .user_repository
        .find_by_id(professional_id)
        .await?
        .filter(|u| u.role == UserRole::Professional)
        .ok_or_else(|| AppError::NotFound("Professional not found".to_string()))?;

    let locale = Locale::parse_or_default(params.locale.as_deref());
    let now = Utc::now();

    let completed_tasks = state
        .task_repository
        .find_completed_by_professional(professional_id)
        .await?
        .into_iter()
        .map(|task| CompletedTaskSummary {
            id: task.id,
            title: task.title,
            category: task.category,
            city: task.city,
            completed: format_relative(task.completed_at.unwrap_or(task.updated_at), now, locale),
        })
        .collect();

    let reviews: Vec<ReviewSummary> = state
        .review_repository
        .find_by_reviewee(professional_id)
        .await?
        .into_iter()
        .map(|review| ReviewSummary {
            rating: review.rating,
            comment: review.comment,
            created: format_relative(review.created_at, now, locale),
        })
        .collect();

    let average_rating = if reviews.is_empty() {
        None
    } else {
        Some(reviews.iter().map(|r| r.rating as f64).sum::<f64>() / reviews.len() as f64)
    };

    Ok(Json(ProfessionalProfile {
        id: user.id,
        display_name: user.display_name,
        bio: user.bio,
        city: user.city,
        member_since: format_relative(user.created_at, now, locale),
        completed_tasks,
        reviews,
        average_rating,
    }))
}
