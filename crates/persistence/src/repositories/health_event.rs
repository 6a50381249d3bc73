//! Health event repository for database operations.
//!
//! Event rows and their animal pivot rows are written and deleted inside one
//! transaction; pivots always go first on delete.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{HealthEventEntity, HealthEventTypeDb};
use crate::metrics::QueryTimer;

/// Repository for health-event database operations.
#[derive(Clone)]
pub struct HealthEventRepository {
    pool: PgPool,
}

impl HealthEventRepository {
    /// Creates a new HealthEventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a health event and its animal pivot rows atomically.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        event_type: HealthEventTypeDb,
        event_date: NaiveDate,
        product_id: Option<Uuid>,
        dosage: Option<&str>,
        administered_by_user_id: Uuid,
        diagnosis: Option<&str>,
        notes: Option<&str>,
        animal_ids: &[Uuid],
    ) -> Result<HealthEventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_health_event");
        tracing::debug!(
            administered_by_user_id = %administered_by_user_id,
            animal_count = animal_ids.len(),
            "inserting health event"
        );

        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, HealthEventEntity>(
            r#"
            INSERT INTO health_events (event_type, event_date, product_id, dosage,
                administered_by_user_id, diagnosis, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, event_type, event_date, product_id, dosage, administered_by_user_id, diagnosis, notes, created_at
            "#,
        )
        .bind(event_type)
        .bind(event_date)
        .bind(product_id)
        .bind(dosage)
        .bind(administered_by_user_id)
        .bind(diagnosis)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        for animal_id in animal_ids {
            sqlx::query(
                r#"
                INSERT INTO health_event_animals (health_event_id, animal_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(event.id)
            .bind(animal_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(event)
    }

    /// Find a health event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<HealthEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_health_event_by_id");
        let result = sqlx::query_as::<_, HealthEventEntity>(
            r#"
            SELECT id, event_type, event_date, product_id, dosage, administered_by_user_id, diagnosis, notes, created_at
            FROM health_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the animal IDs affected by an event.
    pub async fn list_affected_animal_ids(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_health_event_animals");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT animal_id
            FROM health_event_animals
            WHERE health_event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List events visible to a user: administered by them, or touching any
    /// animal they own or can reach through an accessible farm.
    pub async fn list_visible(
        &self,
        user_id: Uuid,
        farm_ids: &[Uuid],
    ) -> Result<Vec<HealthEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_visible_health_events");
        let result = sqlx::query_as::<_, HealthEventEntity>(
            r#"
            SELECT DISTINCT e.id, e.event_type, e.event_date, e.product_id, e.dosage,
                   e.administered_by_user_id, e.diagnosis, e.notes, e.created_at
            FROM health_events e
            LEFT JOIN health_event_animals ea ON ea.health_event_id = e.id
            LEFT JOIN animals a ON a.id = ea.animal_id
            LEFT JOIN lots l ON l.id = a.current_lot_id
            WHERE e.administered_by_user_id = $1
               OR a.owner_user_id = $1
               OR l.farm_id = ANY($2)
            ORDER BY e.event_date DESC, e.id
            "#,
        )
        .bind(user_id)
        .bind(farm_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a health event. The affected-animal set is fixed at creation.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        event_id: Uuid,
        event_type: Option<HealthEventTypeDb>,
        event_date: Option<NaiveDate>,
        product_id: Option<Uuid>,
        dosage: Option<&str>,
        diagnosis: Option<&str>,
        notes: Option<&str>,
    ) -> Result<HealthEventEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_health_event");
        tracing::debug!(event_id = %event_id, "updating health event");
        let result = sqlx::query_as::<_, HealthEventEntity>(
            r#"
            UPDATE health_events
            SET
                event_type = COALESCE($2, event_type),
                event_date = COALESCE($3, event_date),
                product_id = COALESCE($4, product_id),
                dosage = COALESCE($5, dosage),
                diagnosis = COALESCE($6, diagnosis),
                notes = COALESCE($7, notes)
            WHERE id = $1
            RETURNING id, event_type, event_date, product_id, dosage, administered_by_user_id, diagnosis, notes, created_at
            "#,
        )
        .bind(event_id)
        .bind(event_type)
        .bind(event_date)
        .bind(product_id)
        .bind(dosage)
        .bind(diagnosis)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a health event, removing its animal pivot rows first.
    pub async fn delete(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_health_event");
        tracing::debug!(event_id = %event_id, "deleting health event");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM health_event_animals WHERE health_event_id = $1
            "#,
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM health_events WHERE id = $1
            "#,
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: HealthEventRepository tests require a database connection and are covered by integration tests
}
