//! Farm repository for database operations.
//!
//! Besides CRUD, this repository gathers the ownership and grant facts that
//! feed the access resolver. Both fact queries must run inside the same
//! transactional read view as the entity being authorized.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{FarmAccessGrantEntity, FarmEntity, GrantFactEntity};
use crate::metrics::QueryTimer;

/// Repository for farm-related database operations.
#[derive(Clone)]
pub struct FarmRepository {
    pool: PgPool,
}

impl FarmRepository {
    /// Creates a new FarmRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new farm owned by the given user.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        location: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        area_hectares: Option<f64>,
        owner_user_id: Uuid,
        contact_info: Option<&str>,
    ) -> Result<FarmEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_farm");
        tracing::debug!(owner_user_id = %owner_user_id, "inserting farm");
        let result = sqlx::query_as::<_, FarmEntity>(
            r#"
            INSERT INTO farms (name, location, latitude, longitude, area_hectares, owner_user_id, contact_info)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, location, latitude, longitude, area_hectares, owner_user_id, contact_info, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(location)
        .bind(latitude)
        .bind(longitude)
        .bind(area_hectares)
        .bind(owner_user_id)
        .bind(contact_info)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a farm by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FarmEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_farm_by_id");
        let result = sqlx::query_as::<_, FarmEntity>(
            r#"
            SELECT id, name, location, latitude, longitude, area_hectares, owner_user_id, contact_info, created_at, updated_at
            FROM farms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List farms the user owns or holds an active grant on.
    pub async fn list_accessible(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<FarmEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_accessible_farms");
        let result = sqlx::query_as::<_, FarmEntity>(
            r#"
            SELECT DISTINCT f.id, f.name, f.location, f.latitude, f.longitude, f.area_hectares,
                   f.owner_user_id, f.contact_info, f.created_at, f.updated_at
            FROM farms f
            LEFT JOIN farm_access_grants g ON g.farm_id = f.id AND g.user_id = $1
            WHERE f.owner_user_id = $1
               OR (g.user_id IS NOT NULL AND (g.expires_at IS NULL OR g.expires_at > $2))
            ORDER BY f.name
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the IDs of farms owned by the user.
    pub async fn list_owned_farm_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_owned_farm_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM farms WHERE owner_user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the user's grant rows reduced to resolver facts. Expiry
    /// filtering is left to the resolver so the evaluation instant is fixed
    /// in one place.
    pub async fn list_grant_facts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<GrantFactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_grant_facts");
        let result = sqlx::query_as::<_, GrantFactEntity>(
            r#"
            SELECT farm_id, expires_at
            FROM farm_access_grants
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a farm. Ownership is never updated.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        farm_id: Uuid,
        name: Option<&str>,
        location: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        area_hectares: Option<f64>,
        contact_info: Option<&str>,
    ) -> Result<FarmEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_farm");
        tracing::debug!(farm_id = %farm_id, "updating farm");
        let result = sqlx::query_as::<_, FarmEntity>(
            r#"
            UPDATE farms
            SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                area_hectares = COALESCE($6, area_hectares),
                contact_info = COALESCE($7, contact_info),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, location, latitude, longitude, area_hectares, owner_user_id, contact_info, created_at, updated_at
            "#,
        )
        .bind(farm_id)
        .bind(name)
        .bind(location)
        .bind(latitude)
        .bind(longitude)
        .bind(area_hectares)
        .bind(contact_info)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a farm. Lots and grants cascade at the schema level.
    pub async fn delete(&self, farm_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_farm");
        tracing::debug!(farm_id = %farm_id, "deleting farm");
        let result = sqlx::query(
            r#"
            DELETE FROM farms WHERE id = $1
            "#,
        )
        .bind(farm_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Grant shared access to a farm, refreshing the expiry on re-grant.
    pub async fn grant_access(
        &self,
        user_id: Uuid,
        farm_id: Uuid,
        granted_by_user_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<FarmAccessGrantEntity, sqlx::Error> {
        let timer = QueryTimer::new("grant_farm_access");
        tracing::debug!(user_id = %user_id, farm_id = %farm_id, "upserting farm access grant");
        let result = sqlx::query_as::<_, FarmAccessGrantEntity>(
            r#"
            INSERT INTO farm_access_grants (user_id, farm_id, granted_by_user_id, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, farm_id)
            DO UPDATE SET granted_by_user_id = $3, granted_at = NOW(), expires_at = $4
            RETURNING user_id, farm_id, granted_by_user_id, granted_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(farm_id)
        .bind(granted_by_user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Revoke shared access to a farm.
    pub async fn revoke_access(&self, user_id: Uuid, farm_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("revoke_farm_access");
        tracing::debug!(user_id = %user_id, farm_id = %farm_id, "deleting farm access grant");
        let result = sqlx::query(
            r#"
            DELETE FROM farm_access_grants WHERE user_id = $1 AND farm_id = $2
            "#,
        )
        .bind(user_id)
        .bind(farm_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List all grants on a farm.
    pub async fn list_grants_for_farm(
        &self,
        farm_id: Uuid,
    ) -> Result<Vec<FarmAccessGrantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_grants_for_farm");
        let result = sqlx::query_as::<_, FarmAccessGrantEntity>(
            r#"
            SELECT user_id, farm_id, granted_by_user_id, granted_at, expires_at
            FROM farm_access_grants
            WHERE farm_id = $1
            ORDER BY granted_at
            "#,
        )
        .bind(farm_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: FarmRepository tests require a database connection and are covered by integration tests
}
