use crate::error::Result;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Single-use auto-login tokens embedded in notification deep links.
/// A token authenticates exactly one request and then burns.
#[derive(Clone)]
pub struct LoginTokenRepository {
    pool: PgPool,
}

impl LoginTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issues a fresh token valid for 7 days.
    pub async fn create(&self, user_id: Uuid) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::days(7);

        sqlx::query("INSERT INTO login_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(token)
    }

    /// Burns the token and returns its owner. One conditional UPDATE so a
    /// replayed token loses the race instead of authenticating twice.
    pub async fn consume(&self, token: &str) -> Result<Option<Uuid>> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE login_tokens SET used = true
             WHERE token = $1 AND used = false AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id,)| user_id))
    }
}
