//! Master data repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MasterDataEntity;
use crate::metrics::QueryTimer;

/// Repository for master-data database operations.
#[derive(Clone)]
pub struct MasterDataRepository {
    pool: PgPool,
}

impl MasterDataRepository {
    /// Creates a new MasterDataRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a master data row.
    pub async fn create(
        &self,
        category: &str,
        name: &str,
        description: Option<&str>,
        properties: Option<&serde_json::Value>,
        created_by_user_id: Uuid,
    ) -> Result<MasterDataEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_master_data");
        tracing::debug!(category = %category, "inserting master data row");
        let result = sqlx::query_as::<_, MasterDataEntity>(
            r#"
            INSERT INTO master_data (category, name, description, properties, created_by_user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, category, name, description, properties, is_active, created_by_user_id, created_at, updated_at
            "#,
        )
        .bind(category)
        .bind(name)
        .bind(description)
        .bind(properties)
        .bind(created_by_user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a master data row by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MasterDataEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_master_data_by_id");
        let result = sqlx::query_as::<_, MasterDataEntity>(
            r#"
            SELECT id, category, name, description, properties, is_active, created_by_user_id, created_at, updated_at
            FROM master_data
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List active rows in a category.
    pub async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<MasterDataEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_master_data_by_category");
        let result = sqlx::query_as::<_, MasterDataEntity>(
            r#"
            SELECT id, category, name, description, properties, is_active, created_by_user_id, created_at, updated_at
            FROM master_data
            WHERE category = $1 AND is_active = true
            ORDER BY name
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a row exists, is active, and belongs to the expected
    /// category. Used to validate references before a write.
    pub async fn exists_in_category(
        &self,
        id: Uuid,
        category: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_master_data_category");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM master_data
                WHERE id = $1 AND category = $2 AND is_active = true
            )
            "#,
        )
        .bind(id)
        .bind(category)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a master data row.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        properties: Option<&serde_json::Value>,
        is_active: Option<bool>,
    ) -> Result<MasterDataEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_master_data");
        tracing::debug!(master_data_id = %id, "updating master data row");
        let result = sqlx::query_as::<_, MasterDataEntity>(
            r#"
            UPDATE master_data
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                properties = COALESCE($4, properties),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, category, name, description, properties, is_active, created_by_user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(properties)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: MasterDataRepository tests require a database connection and are covered by integration tests
}
