use super::user_models::User;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_telegram_chat_id(&self, chat_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE telegram_chat_id = $1")
            .bind(chat_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Writes the chat identity onto the user row and makes Telegram the
    /// preferred channel. Used by the webhook auto-connect flow.
    pub async fn link_telegram(
        &self,
        user_id: Uuid,
        chat_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET
                telegram_chat_id = $1,
                telegram_username = $2,
                telegram_first_name = $3,
                telegram_last_name = $4,
                preferred_channel = 'telegram',
                updated_at = NOW()
             WHERE id = $5
             RETURNING *",
        )
        .bind(chat_id)
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
