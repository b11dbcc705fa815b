use super::review_models::Review;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A unique (task_id, reviewer_id) index in the store makes a duplicate
    /// insert fail instead of doubling up.
    pub async fn create(
        &self,
        task_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Review> {
        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (task_id, reviewer_id, reviewee_id, rating, comment, review_type)
             VALUES ($1, $2, $3, $4, $5, 'customer_to_professional')
             RETURNING *",
        )
        .bind(task_id)
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn find_by_reviewee(&self, reviewee_id: Uuid) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE reviewee_id = $1 ORDER BY created_at DESC",
        )
        .bind(reviewee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
