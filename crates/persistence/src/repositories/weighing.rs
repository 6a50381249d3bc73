//! Weighing repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::WeighingEntity;
use crate::metrics::QueryTimer;

const WEIGHING_COLUMNS: &str = "id, animal_id, weighing_date, weight_kg, notes, created_at";

/// Repository for weighing database operations.
#[derive(Clone)]
pub struct WeighingRepository {
    pool: PgPool,
}

impl WeighingRepository {
    /// Creates a new WeighingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a weighing for an animal.
    pub async fn create(
        &self,
        animal_id: Uuid,
        weighing_date: NaiveDate,
        weight_kg: f64,
        notes: Option<&str>,
    ) -> Result<WeighingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_weighing");
        tracing::debug!(animal_id = %animal_id, weighing_date = %weighing_date, "inserting weighing");
        let result = sqlx::query_as::<_, WeighingEntity>(&format!(
            r#"
            INSERT INTO weighings (animal_id, weighing_date, weight_kg, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {WEIGHING_COLUMNS}
            "#,
        ))
        .bind(animal_id)
        .bind(weighing_date)
        .bind(weight_kg)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a weighing by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WeighingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_weighing_by_id");
        let result = sqlx::query_as::<_, WeighingEntity>(&format!(
            r#"
            SELECT {WEIGHING_COLUMNS}
            FROM weighings
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List weighings of animals the user owns or can reach through an
    /// accessible farm, optionally narrowed to one animal. Newest first.
    pub async fn list_visible(
        &self,
        user_id: Uuid,
        farm_ids: &[Uuid],
        animal_filter: Option<Uuid>,
    ) -> Result<Vec<WeighingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_visible_weighings");
        let result = sqlx::query_as::<_, WeighingEntity>(
            r#"
            SELECT w.id, w.animal_id, w.weighing_date, w.weight_kg, w.notes, w.created_at
            FROM weighings w
            JOIN animals a ON a.id = w.animal_id
            LEFT JOIN lots l ON l.id = a.current_lot_id
            WHERE (a.owner_user_id = $1 OR l.farm_id = ANY($2))
              AND ($3::uuid IS NULL OR w.animal_id = $3)
            ORDER BY w.weighing_date DESC, w.id
            "#,
        )
        .bind(user_id)
        .bind(farm_ids)
        .bind(animal_filter)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a weighing. The animal is fixed at creation.
    pub async fn update(
        &self,
        weighing_id: Uuid,
        weighing_date: Option<NaiveDate>,
        weight_kg: Option<f64>,
        notes: Option<&str>,
    ) -> Result<WeighingEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_weighing");
        tracing::debug!(weighing_id = %weighing_id, "updating weighing");
        let result = sqlx::query_as::<_, WeighingEntity>(&format!(
            r#"
            UPDATE weighings
            SET
                weighing_date = COALESCE($2, weighing_date),
                weight_kg = COALESCE($3, weight_kg),
                notes = COALESCE($4, notes)
            WHERE id = $1
            RETURNING {WEIGHING_COLUMNS}
            "#,
        ))
        .bind(weighing_id)
        .bind(weighing_date)
        .bind(weight_kg)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a weighing.
    pub async fn delete(&self, weighing_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_weighing");
        tracing::debug!(weighing_id = %weighing_id, "deleting weighing");
        let result = sqlx::query(
            r#"
            DELETE FROM weighings WHERE id = $1
            "#,
        )
        .bind(weighing_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: WeighingRepository tests require a database connection and are covered by integration tests
}
