//! Group repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GroupMembershipEntity, GrupoEntity};
use crate::metrics::QueryTimer;

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GrupoRepository {
    pool: PgPool,
}

impl GrupoRepository {
    /// Creates a new GrupoRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        purpose_id: Option<Uuid>,
        created_by_user_id: Uuid,
    ) -> Result<GrupoEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_grupo");
        tracing::debug!(created_by_user_id = %created_by_user_id, "inserting grupo");
        let result = sqlx::query_as::<_, GrupoEntity>(
            r#"
            INSERT INTO grupos (name, description, purpose_id, created_by_user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, purpose_id, created_by_user_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(purpose_id)
        .bind(created_by_user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GrupoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_grupo_by_id");
        let result = sqlx::query_as::<_, GrupoEntity>(
            r#"
            SELECT id, name, description, purpose_id, created_by_user_id, created_at, updated_at
            FROM grupos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the groups created by a user.
    pub async fn list_by_creator(&self, user_id: Uuid) -> Result<Vec<GrupoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_grupos_by_creator");
        let result = sqlx::query_as::<_, GrupoEntity>(
            r#"
            SELECT id, name, description, purpose_id, created_by_user_id, created_at, updated_at
            FROM grupos
            WHERE created_by_user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a group.
    pub async fn update(
        &self,
        grupo_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        purpose_id: Option<Uuid>,
    ) -> Result<GrupoEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_grupo");
        tracing::debug!(grupo_id = %grupo_id, "updating grupo");
        let result = sqlx::query_as::<_, GrupoEntity>(
            r#"
            UPDATE grupos
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                purpose_id = COALESCE($4, purpose_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, purpose_id, created_by_user_id, created_at, updated_at
            "#,
        )
        .bind(grupo_id)
        .bind(name)
        .bind(description)
        .bind(purpose_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a group, removing its membership rows first.
    pub async fn delete(&self, grupo_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_grupo");
        tracing::debug!(grupo_id = %grupo_id, "deleting grupo");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM animal_grupo_memberships WHERE grupo_id = $1
            "#,
        )
        .bind(grupo_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM grupos WHERE id = $1
            "#,
        )
        .bind(grupo_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Find the active membership row for a `(animal, grupo)` pair, if any.
    pub async fn find_active_membership(
        &self,
        animal_id: Uuid,
        grupo_id: Uuid,
    ) -> Result<Option<GroupMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_grupo_membership");
        let result = sqlx::query_as::<_, GroupMembershipEntity>(
            r#"
            SELECT animal_id, grupo_id, assigned_date, removed_date, notes, created_at
            FROM animal_grupo_memberships
            WHERE animal_id = $1 AND grupo_id = $2 AND removed_date IS NULL
            "#,
        )
        .bind(animal_id)
        .bind(grupo_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Assign an animal to a group.
    pub async fn add_membership(
        &self,
        animal_id: Uuid,
        grupo_id: Uuid,
        assigned_date: NaiveDate,
        removed_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<GroupMembershipEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_grupo_membership");
        tracing::debug!(animal_id = %animal_id, grupo_id = %grupo_id, "inserting grupo membership");
        let result = sqlx::query_as::<_, GroupMembershipEntity>(
            r#"
            INSERT INTO animal_grupo_memberships (animal_id, grupo_id, assigned_date, removed_date, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING animal_id, grupo_id, assigned_date, removed_date, notes, created_at
            "#,
        )
        .bind(animal_id)
        .bind(grupo_id)
        .bind(assigned_date)
        .bind(removed_date)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Close the active membership of an animal in a group.
    pub async fn remove_membership(
        &self,
        animal_id: Uuid,
        grupo_id: Uuid,
        removed_date: NaiveDate,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_grupo_membership");
        tracing::debug!(animal_id = %animal_id, grupo_id = %grupo_id, "closing grupo membership");
        let result = sqlx::query(
            r#"
            UPDATE animal_grupo_memberships
            SET removed_date = $3
            WHERE animal_id = $1 AND grupo_id = $2 AND removed_date IS NULL
            "#,
        )
        .bind(animal_id)
        .bind(grupo_id)
        .bind(removed_date)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List membership rows for a group, active first.
    pub async fn list_memberships(
        &self,
        grupo_id: Uuid,
    ) -> Result<Vec<GroupMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_grupo_memberships");
        let result = sqlx::query_as::<_, GroupMembershipEntity>(
            r#"
            SELECT animal_id, grupo_id, assigned_date, removed_date, notes, created_at
            FROM animal_grupo_memberships
            WHERE grupo_id = $1
            ORDER BY removed_date IS NOT NULL, assigned_date DESC
            "#,
        )
        .bind(grupo_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: GrupoRepository tests require a database connection and are covered by integration tests
}
