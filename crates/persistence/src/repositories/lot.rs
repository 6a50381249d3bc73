//! Lot repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::LotEntity;
use crate::metrics::QueryTimer;

/// Repository for lot-related database operations.
#[derive(Clone)]
pub struct LotRepository {
    pool: PgPool,
}

impl LotRepository {
    /// Creates a new LotRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new lot on a farm.
    pub async fn create(
        &self,
        farm_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<LotEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_lot");
        tracing::debug!(farm_id = %farm_id, "inserting lot");
        let result = sqlx::query_as::<_, LotEntity>(
            r#"
            INSERT INTO lots (farm_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, farm_id, name, description, created_at, updated_at
            "#,
        )
        .bind(farm_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a lot by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LotEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_lot_by_id");
        let result = sqlx::query_as::<_, LotEntity>(
            r#"
            SELECT id, farm_id, name, description, created_at, updated_at
            FROM lots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the lots of a farm.
    pub async fn list_by_farm(&self, farm_id: Uuid) -> Result<Vec<LotEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_lots_by_farm");
        let result = sqlx::query_as::<_, LotEntity>(
            r#"
            SELECT id, farm_id, name, description, created_at, updated_at
            FROM lots
            WHERE farm_id = $1
            ORDER BY name
            "#,
        )
        .bind(farm_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a lot.
    pub async fn update(
        &self,
        lot_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<LotEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_lot");
        tracing::debug!(lot_id = %lot_id, "updating lot");
        let result = sqlx::query_as::<_, LotEntity>(
            r#"
            UPDATE lots
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, farm_id, name, description, created_at, updated_at
            "#,
        )
        .bind(lot_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a lot. Animals referencing it fall back to no current lot.
    pub async fn delete(&self, lot_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_lot");
        tracing::debug!(lot_id = %lot_id, "deleting lot");
        let result = sqlx::query(
            r#"
            DELETE FROM lots WHERE id = $1
            "#,
        )
        .bind(lot_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: LotRepository tests require a database connection and are covered by integration tests
}
