use super::task_models::{RejectReason, Task, TaskStatus, TimingImpact};
use super::task_repository::TaskRepository;
use crate::application::{ApplicationRepository, ApplicationStatus};
use crate::error::{AppError, Result};
use crate::i18n::Locale;
use crate::notification::{
    DeliveryChannel, NotificationRequest, NotificationRouter, NotificationType, TemplateData,
};
use crate::review::ReviewRepository;
use crate::user::user_repository::UserRepository;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

/// Classifies a withdrawal by how long the professional held the assignment.
/// Half-open intervals: [0,2h) low, [2h,24h) medium, [24h,∞) high.
pub fn timing_impact(elapsed: Duration) -> TimingImpact {
    if elapsed < Duration::hours(2) {
        TimingImpact::Low
    } else if elapsed < Duration::hours(24) {
        TimingImpact::Medium
    } else {
        TimingImpact::High
    }
}

/// Outcome of one best-effort step downstream of the primary transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    Succeeded,
    Failed,
    Skipped,
}

/// Per-step report so callers and tests can see side-effect outcomes without
/// any of them masking the primary result.
#[derive(Debug, Clone, Copy)]
pub struct SideEffects {
    pub notification: SideEffect,
    pub review: SideEffect,
    pub cleanup: SideEffect,
    pub application_update: SideEffect,
}

impl SideEffects {
    fn none() -> Self {
        Self {
            notification: SideEffect::Skipped,
            review: SideEffect::Skipped,
            cleanup: SideEffect::Skipped,
            application_update: SideEffect::Skipped,
        }
    }
}

#[derive(Debug)]
pub struct WithdrawOutcome {
    pub task: Task,
    pub timing_impact: TimingImpact,
    pub withdrawals_this_month: i64,
    pub side_effects: SideEffects,
}

#[derive(Debug)]
pub struct ConfirmOutcome {
    pub task: Task,
    pub side_effects: SideEffects,
}

pub enum ConfirmDecision {
    Confirm {
        rating: Option<i32>,
        review_text: Option<String>,
    },
    Reject {
        reason: RejectReason,
    },
}

/// Orchestrates the task lifecycle handshake: withdraw, confirm, reject.
/// Every transition is one conditional UPDATE guarded on the expected status
/// and actor, so racing requests cannot both pass a stale precondition.
#[derive(Clone)]
pub struct TaskService {
    tasks: TaskRepository,
    applications: ApplicationRepository,
    reviews: ReviewRepository,
    users: UserRepository,
    router: NotificationRouter,
}

impl TaskService {
    pub fn new(
        tasks: TaskRepository,
        applications: ApplicationRepository,
        reviews: ReviewRepository,
        users: UserRepository,
        router: NotificationRouter,
    ) -> Self {
        Self {
            tasks,
            applications,
            reviews,
            users,
            router,
        }
    }

    /// Professional voluntarily exits an in-progress task, reopening it.
    pub async fn withdraw(
        &self,
        task_id: Uuid,
        professional_id: Uuid,
        reason: &str,
        description: Option<&str>,
    ) -> Result<WithdrawOutcome> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        if task.status != TaskStatus::InProgress {
            return Err(AppError::StateConflict(format!(
                "Cannot withdraw from a task with status '{}'",
                task.status
            )));
        }

        if task.selected_professional_id != Some(professional_id) {
            return Err(AppError::Forbidden(
                "Only the assigned professional can withdraw".to_string(),
            ));
        }

        let application = self
            .applications
            .find_by_task_and_professional(task_id, professional_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        if application.status != ApplicationStatus::Accepted {
            return Err(AppError::StateConflict(
                "Application is not in accepted state".to_string(),
            ));
        }

        let accepted_at = application.accepted_at.unwrap_or(application.created_at);
        let impact = timing_impact(Utc::now().signed_duration_since(accepted_at));

        // Primary transition: both row updates are status-guarded.
        let task = self
            .tasks
            .reopen_after_withdrawal(task_id, professional_id)
            .await?
            .ok_or_else(|| {
                AppError::StateConflict("Task is no longer in progress".to_string())
            })?;

        self.applications
            .mark_withdrawn(application.id, impact.as_str())
            .await?;

        // Quota report only; the monthly limit is not enforced as a rejection.
        let withdrawals_this_month = match self
            .applications
            .count_recent_impactful_withdrawals(professional_id)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(%professional_id, error = %e, "Withdrawal quota count failed");
                0
            }
        };

        let professional_name = self.display_name_of(professional_id).await;
        let outcome = self
            .router
            .notify(NotificationRequest {
                metadata: Some(json!({
                    "reason": reason,
                    "description": description,
                    "timing_impact": impact.as_str(),
                })),
                action_url: Some(format!("/tasks/{}", task.id)),
                delivery_channel: Some(DeliveryChannel::Both),
                template_data: Some(TemplateData {
                    task_title: Some(task.title.clone()),
                    counterpart_name: Some(professional_name),
                    reason: Some(reason.to_string()),
                }),
                ..NotificationRequest::new(
                    task.customer_id,
                    NotificationType::ProfessionalWithdrew,
                )
            })
            .await;

        let side_effects = SideEffects {
            notification: if outcome.success {
                SideEffect::Succeeded
            } else {
                SideEffect::Failed
            },
            ..SideEffects::none()
        };

        Ok(WithdrawOutcome {
            task,
            timing_impact: impact,
            withdrawals_this_month,
            side_effects,
        })
    }

    /// Customer accepts or rejects the professional's completion claim.
    pub async fn confirm_completion(
        &self,
        task_id: Uuid,
        customer_id: Uuid,
        decision: ConfirmDecision,
    ) -> Result<ConfirmOutcome> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        if task.customer_id != customer_id {
            return Err(AppError::Forbidden(
                "Only the task owner can confirm completion".to_string(),
            ));
        }

        if task.status != TaskStatus::PendingCustomerConfirmation {
            return Err(AppError::StateConflict(format!(
                "Task is not awaiting confirmation (status '{}')",
                task.status
            )));
        }

        match decision {
            ConfirmDecision::Confirm {
                rating,
                review_text,
            } => self.confirm(task, customer_id, rating, review_text).await,
            ConfirmDecision::Reject { reason } => self.reject(task, customer_id, reason).await,
        }
    }

    async fn confirm(
        &self,
        task: Task,
        customer_id: Uuid,
        rating: Option<i32>,
        review_text: Option<String>,
    ) -> Result<ConfirmOutcome> {
        let professional_id = task.selected_professional_id.ok_or_else(|| {
            AppError::StateConflict("Task has no assigned professional".to_string())
        })?;

        let task = self
            .tasks
            .confirm_completion(task.id, customer_id)
            .await?
            .ok_or_else(|| {
                AppError::StateConflict("Task is no longer awaiting confirmation".to_string())
            })?;

        let mut side_effects = SideEffects::none();

        // Everything past the transition is best-effort and isolated per step.
        side_effects.application_update = match self
            .applications
            .mark_completed(task.id, professional_id)
            .await
        {
            Ok(_) => SideEffect::Succeeded,
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "Failed to close accepted application");
                SideEffect::Failed
            }
        };

        side_effects.cleanup = match self.applications.delete_rejected_for_task(task.id).await {
            Ok(deleted) => {
                tracing::debug!(task_id = %task.id, deleted, "Purged rejected applications");
                SideEffect::Succeeded
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "Rejected-application cleanup failed");
                SideEffect::Failed
            }
        };

        if rating.is_some() || review_text.is_some() {
            let rating = rating.unwrap_or(5);
            side_effects.review = match self
                .reviews
                .create(
                    task.id,
                    customer_id,
                    professional_id,
                    rating,
                    review_text.as_deref(),
                )
                .await
            {
                Ok(_) => SideEffect::Succeeded,
                Err(e) => {
                    tracing::warn!(task_id = %task.id, error = %e, "Review insert failed");
                    SideEffect::Failed
                }
            };
        }

        let customer_name = self.display_name_of(customer_id).await;
        let outcome = self
            .router
            .notify(NotificationRequest {
                action_url: Some(format!("/tasks/{}", task.id)),
                delivery_channel: Some(DeliveryChannel::Both),
                template_data: Some(TemplateData {
                    task_title: Some(task.title.clone()),
                    counterpart_name: Some(customer_name),
                    reason: None,
                }),
                ..NotificationRequest::new(professional_id, NotificationType::TaskCompleted)
            })
            .await;
        side_effects.notification = if outcome.success {
            SideEffect::Succeeded
        } else {
            SideEffect::Failed
        };

        Ok(ConfirmOutcome { task, side_effects })
    }

    async fn reject(
        &self,
        task: Task,
        customer_id: Uuid,
        reason: RejectReason,
    ) -> Result<ConfirmOutcome> {
        let professional_id = task.selected_professional_id.ok_or_else(|| {
            AppError::StateConflict("Task has no assigned professional".to_string())
        })?;

        let task = self
            .tasks
            .reject_completion(task.id, customer_id)
            .await?
            .ok_or_else(|| {
                AppError::StateConflict("Task is no longer awaiting confirmation".to_string())
            })?;

        let mut side_effects = SideEffects::none();

        // The reason label is rendered in the recipient's locale.
        let professional_locale = match self.users.find_by_id(professional_id).await {
            Ok(Some(user)) => Locale::parse_or_default(Some(user.locale.as_str())),
            _ => Locale::default(),
        };

        let customer_name = self.display_name_of(customer_id).await;
        let outcome = self
            .router
            .notify(NotificationRequest {
                metadata: Some(json!({ "reason": reason })),
                action_url: Some(format!("/tasks/{}", task.id)),
                delivery_channel: Some(DeliveryChannel::Both),
                template_data: Some(TemplateData {
                    task_title: Some(task.title.clone()),
                    counterpart_name: Some(customer_name),
                    reason: Some(reason.label(professional_locale).to_string()),
                }),
                ..NotificationRequest::new(professional_id, NotificationType::CompletionRejected)
            })
            .await;
        side_effects.notification = if outcome.success {
            SideEffect::Succeeded
        } else {
            SideEffect::Failed
        };

        Ok(ConfirmOutcome { task, side_effects })
    }

    async fn display_name_of(&self, user_id: Uuid) -> String {
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user.display_name,
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_impact_low_below_two_hours() {
        assert_eq!(timing_impact(Duration::zero()), TimingImpact::Low);
        assert_eq!(timing_impact(Duration::minutes(119)), TimingImpact::Low);
    }

    #[test]
    fn test_timing_impact_boundary_at_two_hours_is_medium() {
        assert_eq!(timing_impact(Duration::hours(2)), TimingImpact::Medium);
    }

    #[test]
    fn test_timing_impact_medium_below_twenty_four_hours() {
        assert_eq!(timing_impact(Duration::hours(12)), TimingImpact::Medium);
        assert_eq!(
            timing_impact(Duration::hours(23) + Duration::minutes(59)),
            TimingImpact::Medium
        );
    }

    #[test]
    fn test_timing_impact_boundary_at_twenty_four_hours_is_high() {
        assert_eq!(timing_impact(Duration::hours(24)), TimingImpact::High);
        assert_eq!(timing_impact(Duration::days(10)), TimingImpact::High);
    }
}
