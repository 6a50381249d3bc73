//! Feeding repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FeedingEntity;
use crate::metrics::QueryTimer;

/// Repository for feeding database operations.
#[derive(Clone)]
pub struct FeedingRepository {
    pool: PgPool,
}

impl FeedingRepository {
    /// Creates a new FeedingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a feeding and its animal pivot rows atomically.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        feeding_date: NaiveDate,
        feed_type_id: Uuid,
        quantity_kg: f64,
        supplement_id: Option<Uuid>,
        administered_by_user_id: Uuid,
        notes: Option<&str>,
        animal_ids: &[Uuid],
    ) -> Result<FeedingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_feeding");
        tracing::debug!(
            administered_by_user_id = %administered_by_user_id,
            animal_count = animal_ids.len(),
            "inserting feeding"
        );

        let mut tx = self.pool.begin().await?;

        let feeding = sqlx::query_as::<_, FeedingEntity>(
            r#"
            INSERT INTO feedings (feeding_date, feed_type_id, quantity_kg, supplement_id,
                administered_by_user_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, feeding_date, feed_type_id, quantity_kg, supplement_id, administered_by_user_id, notes, created_at
            "#,
        )
        .bind(feeding_date)
        .bind(feed_type_id)
        .bind(quantity_kg)
        .bind(supplement_id)
        .bind(administered_by_user_id)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        for animal_id in animal_ids {
            sqlx::query(
                r#"
                INSERT INTO feeding_animals (feeding_id, animal_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(feeding.id)
            .bind(animal_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(feeding)
    }

    /// Find a feeding by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_feeding_by_id");
        let result = sqlx::query_as::<_, FeedingEntity>(
            r#"
            SELECT id, feeding_date, feed_type_id, quantity_kg, supplement_id, administered_by_user_id, notes, created_at
            FROM feedings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the animal IDs a feeding covers.
    pub async fn list_affected_animal_ids(
        &self,
        feeding_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_feeding_animals");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT animal_id
            FROM feeding_animals
            WHERE feeding_id = $1
            "#,
        )
        .bind(feeding_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List feedings administered by a user. Feedings are administrator
    /// scoped, so this is the full visible set.
    pub async fn list_by_administrator(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FeedingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_feedings_by_administrator");
        let result = sqlx::query_as::<_, FeedingEntity>(
            r#"
            SELECT id, feeding_date, feed_type_id, quantity_kg, supplement_id, administered_by_user_id, notes, created_at
            FROM feedings
            WHERE administered_by_user_id = $1
            ORDER BY feeding_date DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a feeding. The affected-animal set is fixed at creation.
    pub async fn update(
        &self,
        feeding_id: Uuid,
        feeding_date: Option<NaiveDate>,
        feed_type_id: Option<Uuid>,
        quantity_kg: Option<f64>,
        supplement_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<FeedingEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_feeding");
        tracing::debug!(feeding_id = %feeding_id, "updating feeding");
        let result = sqlx::query_as::<_, FeedingEntity>(
            r#"
            UPDATE feedings
            SET
                feeding_date = COALESCE($2, feeding_date),
                feed_type_id = COALESCE($3, feed_type_id),
                quantity_kg = COALESCE($4, quantity_kg),
                supplement_id = COALESCE($5, supplement_id),
                notes = COALESCE($6, notes)
            WHERE id = $1
            RETURNING id, feeding_date, feed_type_id, quantity_kg, supplement_id, administered_by_user_id, notes, created_at
            "#,
        )
        .bind(feeding_id)
        .bind(feeding_date)
        .bind(feed_type_id)
        .bind(quantity_kg)
        .bind(supplement_id)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a feeding, removing its animal pivot rows first.
    pub async fn delete(&self, feeding_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_feeding");
        tracing::debug!(feeding_id = %feeding_id, "deleting feeding");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM feeding_animals WHERE feeding_id = $1
            "#,
        )
        .bind(feeding_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM feedings WHERE id = $1
            "#,
        )
        .bind(feeding_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: FeedingRepository tests require a database connection and are covered by integration tests
}
