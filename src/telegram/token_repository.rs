use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// One-time credential linking a web session to a Telegram chat identity.
#[derive(Debug, Clone, FromRow)]
pub struct TelegramConnectionToken {
    pub token: String,
    pub user_id: Uuid,
    pub locale: String,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TelegramConnectionToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Clone)]
pub struct TelegramTokenRepository {
    pool: PgPool,
}

impl TelegramTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, token: &str) -> Result<Option<TelegramConnectionToken>> {
        let row = sqlx::query_as::<_, TelegramConnectionToken>(
            "SELECT * FROM telegram_connection_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Marks the token used if and only if it is still live. One conditional
    /// UPDATE, so two chats racing on the same token cannot both connect.
    pub async fn consume(&self, token: &str) -> Result<Option<Uuid>> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE telegram_connection_tokens SET used = true
             WHERE token = $1 AND used = false AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id,)| user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> TelegramConnectionToken {
        TelegramConnectionToken {
            token: "x".repeat(32),
            user_id: Uuid::new_v4(),
            locale: "bg".to_string(),
            used: false,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        assert!(token_expiring_at(now).is_expired(now));
        assert!(token_expiring_at(now - Duration::seconds(1)).is_expired(now));
        assert!(!token_expiring_at(now + Duration::minutes(5)).is_expired(now));
    }
}
