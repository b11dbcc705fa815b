use super::task_dto::CreateTaskRequest;
use super::task_models::Task;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

#[derive(Debug, Default)]
pub struct TaskFilters {
    pub category: Option<String>,
    pub city: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, customer_id: Uuid, payload: &CreateTaskRequest) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks
                (customer_id, title, description, category, subcategory, city, neighborhood,
                 budget_min, budget_max, budget_type, requirements, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'open')
             RETURNING *",
        )
        .bind(customer_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(&payload.subcategory)
        .bind(&payload.city)
        .bind(&payload.neighborhood)
        .bind(payload.budget_min)
        .bind(payload.budget_max)
        .bind(&payload.budget_type)
        .bind(&payload.requirements)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    /// Publicly listed open tasks with optional category/city filters.
    pub async fn find_open(&self, filters: TaskFilters) -> Result<(Vec<Task>, i64)> {
        let page = filters.page.unwrap_or(1).max(1);
        let limit = filters.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page as i64 - 1) * limit as i64;

        let mut where_clause = "WHERE status = 'open'".to_string();
        let mut params_count = 0;

        if filters.category.is_some() {
            params_count += 1;
            where_clause.push_str(&format!(" AND category = ${}", params_count));
        }
        if filters.city.is_some() {
            params_count += 1;
            where_clause.push_str(&format!(" AND city = ${}", params_count));
        }

        let count_sql = format!("SELECT COUNT(*) FROM tasks {}", where_clause);
        let list_sql = format!(
            "SELECT * FROM tasks {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            params_count + 1,
            params_count + 2
        );

        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        let mut list_query = sqlx::query_as::<_, Task>(&list_sql);

        if let Some(category) = &filters.category {
            count_query = count_query.bind(category);
            list_query = list_query.bind(category);
        }
        if let Some(city) = &filters.city {
            count_query = count_query.bind(city);
            list_query = list_query.bind(city);
        }

        let (total,) = count_query.fetch_one(&self.pool).await?;
        let tasks = list_query
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((tasks, total))
    }

    /// Tasks the caller posted, newest first.
    pub async fn find_posted_by(&self, customer_id: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Curated front-page set: the freshest open tasks.
    pub async fn find_featured(&self, limit: i64) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE status = 'open' ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn find_completed_by_professional(&self, professional_id: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE selected_professional_id = $1 AND status = 'completed'
             ORDER BY completed_at DESC",
        )
        .bind(professional_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// in_progress -> open, clearing the assignment. The status and actor
    /// guards live in the UPDATE itself so a concurrent transition on the
    /// same row affects zero rows here instead of clobbering it.
    pub async fn reopen_after_withdrawal(
        &self,
        task_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET status = 'open', selected_professional_id = NULL, updated_at = NOW()
             WHERE id = $1 AND status = 'in_progress' AND selected_professional_id = $2
             RETURNING *",
        )
        .bind(task_id)
        .bind(professional_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// pending_customer_confirmation -> completed, stamping both timestamps.
    pub async fn confirm_completion(&self, task_id: Uuid, customer_id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET status = 'completed',
                 confirmed_by_customer_at = NOW(),
                 completed_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1 AND status = 'pending_customer_confirmation' AND customer_id = $2
             RETURNING *",
        )
        .bind(task_id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// pending_customer_confirmation -> in_progress, wiping the
    /// professional's completion claim.
    pub async fn reject_completion(&self, task_id: Uuid, customer_id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET status = 'in_progress',
                 completed_by_professional_at = NULL,
                 updated_at = NOW()
             WHERE id = $1 AND status = 'pending_customer_confirmation' AND customer_id = $2
             RETURNING *",
        )
        .bind(task_id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }
}
