use super::task_models::{Task, TimingImpact};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub subcategory: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    pub neighborhood: Option<String>,
    #[validate(range(min = 0))]
    pub budget_min: Option<i32>,
    #[validate(range(min = 0))]
    pub budget_max: Option<i32>,
    pub budget_type: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    /// Why the professional is exiting; required.
    pub reason: Option<String>,
    pub description: Option<String>,
}

/// Web clients send these fields camelCased.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmCompletionRequest {
    /// "confirm" or "reject".
    pub action: String,
    pub confirmation_data: Option<ConfirmationData>,
    /// Required on the reject path; one of the closed reject-reason set.
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationData {
    pub rating: Option<i32>,
    pub review_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawResponse {
    pub success: bool,
    pub task: Task,
    pub timing_impact: TimingImpact,
    /// Non-low withdrawals in the last rolling 30 days, this one included.
    pub withdrawals_this_month: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmCompletionResponse {
    pub success: bool,
    pub task: Task,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}
