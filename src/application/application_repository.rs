use super::application_models::Application;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_task_and_professional(
        &self,
        task_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE task_id = $1 AND professional_id = $2",
        )
        .bind(task_id)
        .bind(professional_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    /// Accepted -> withdrawn, stamping when and how disruptive the
    /// withdrawal was. Conditional on the current status so a racing second
    /// withdraw affects zero rows.
    pub async fn mark_withdrawn(
        &self,
        id: Uuid,
        timing_impact: &str,
    ) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            "UPDATE applications
             SET status = 'withdrawn', withdrawn_at = NOW(), withdrawal_impact = $1
             WHERE id = $2 AND status = 'accepted'
             RETURNING *",
        )
        .bind(timing_impact)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    /// Accepted -> completed once the customer confirms the task.
    pub async fn mark_completed(&self, task_id: Uuid, professional_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE applications SET status = 'completed'
             WHERE task_id = $1 AND professional_id = $2 AND status = 'accepted'",
        )
        .bind(task_id)
        .bind(professional_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Cleanup after a confirmed completion; returns how many rows went away.
    pub async fn delete_rejected_for_task(&self, task_id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM applications WHERE task_id = $1 AND status = 'rejected'")
                .bind(task_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Non-low-impact withdrawals by this professional in the last rolling
    /// 30 days, for the monthly quota report.
    pub async fn count_recent_impactful_withdrawals(&self, professional_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM applications
             WHERE professional_id = $1
               AND status = 'withdrawn'
               AND withdrawal_impact <> 'low'
               AND withdrawn_at > NOW() - INTERVAL '30 days'",
        )
        .bind(professional_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
