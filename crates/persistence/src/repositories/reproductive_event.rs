//! Reproductive event repository for database operations.
//!
//! Event rows and their offspring links are deleted inside one transaction;
//! offspring links always go first.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GestationDiagnosisResultDb, ReproductiveEventEntity, ReproductiveEventTypeDb};
use crate::metrics::QueryTimer;

const EVENT_COLUMNS: &str = "id, animal_id, event_type, event_date, sire_animal_id, \
     gestation_diagnosis_result, expected_delivery_date, actual_delivery_date, \
     number_of_offspring, notes, created_at";

/// Repository for reproductive-event database operations.
#[derive(Clone)]
pub struct ReproductiveEventRepository {
    pool: PgPool,
}

impl ReproductiveEventRepository {
    /// Creates a new ReproductiveEventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a reproductive event for a dam.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        animal_id: Uuid,
        event_type: ReproductiveEventTypeDb,
        event_date: NaiveDate,
        sire_animal_id: Option<Uuid>,
        gestation_diagnosis_result: Option<GestationDiagnosisResultDb>,
        expected_delivery_date: Option<NaiveDate>,
        actual_delivery_date: Option<NaiveDate>,
        number_of_offspring: Option<i32>,
        notes: Option<&str>,
    ) -> Result<ReproductiveEventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_reproductive_event");
        tracing::debug!(animal_id = %animal_id, "inserting reproductive event");
        let result = sqlx::query_as::<_, ReproductiveEventEntity>(&format!(
            r#"
            INSERT INTO reproductive_events (animal_id, event_type, event_date, sire_animal_id,
                gestation_diagnosis_result, expected_delivery_date, actual_delivery_date,
                number_of_offspring, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(animal_id)
        .bind(event_type)
        .bind(event_date)
        .bind(sire_animal_id)
        .bind(gestation_diagnosis_result)
        .bind(expected_delivery_date)
        .bind(actual_delivery_date)
        .bind(number_of_offspring)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a reproductive event by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ReproductiveEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reproductive_event_by_id");
        let result = sqlx::query_as::<_, ReproductiveEventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM reproductive_events
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the offspring animal IDs linked to an event.
    pub async fn list_offspring_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_reproductive_event_offspring");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT offspring_animal_id
            FROM offspring_born
            WHERE reproductive_event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List events visible to a user: any event whose dam or sire the user
    /// owns or can reach through an accessible farm, optionally narrowed to
    /// one dam.
    pub async fn list_visible(
        &self,
        user_id: Uuid,
        farm_ids: &[Uuid],
        animal_filter: Option<Uuid>,
    ) -> Result<Vec<ReproductiveEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_visible_reproductive_events");
        let result = sqlx::query_as::<_, ReproductiveEventEntity>(
            r#"
            SELECT DISTINCT e.id, e.animal_id, e.event_type, e.event_date, e.sire_animal_id,
                   e.gestation_diagnosis_result, e.expected_delivery_date,
                   e.actual_delivery_date, e.number_of_offspring, e.notes, e.created_at
            FROM reproductive_events e
            JOIN animals dam ON dam.id = e.animal_id
            LEFT JOIN lots dam_lot ON dam_lot.id = dam.current_lot_id
            LEFT JOIN animals sire ON sire.id = e.sire_animal_id
            LEFT JOIN lots sire_lot ON sire_lot.id = sire.current_lot_id
            WHERE (dam.owner_user_id = $1 OR dam_lot.farm_id = ANY($2)
                   OR sire.owner_user_id = $1 OR sire_lot.farm_id = ANY($2))
              AND ($3::uuid IS NULL OR e.animal_id = $3)
            ORDER BY e.event_date DESC, e.id
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

    /// Update a reproductive event. The dam and sire are fixed at creation.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        event_id: Uuid,
        event_type: Option<ReproductiveEventTypeDb>,
        event_date: Option<NaiveDate>,
        gestation_diagnosis_result: Option<GestationDiagnosisResultDb>,
        expected_delivery_date: Option<NaiveDate>,
        actual_delivery_date: Option<NaiveDate>,
        number_of_offspring: Option<i32>,
        notes: Option<&str>,
    ) -> Result<ReproductiveEventEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_reproductive_event");
        tracing::debug!(event_id = %event_id, "updating reproductive event");
        let result = sqlx::query_as::<_, ReproductiveEventEntity>(&format!(
            r#"
            UPDATE reproductive_events
            SET
                event_type = COALESCE($2, event_type),
                event_date = COALESCE($3, event_date),
                gestation_diagnosis_result = COALESCE($4, gestation_diagnosis_result),
                expected_delivery_date = COALESCE($5, expected_delivery_date),
                actual_delivery_date = COALESCE($6, actual_delivery_date),
                number_of_offspring = COALESCE($7, number_of_offspring),
                notes = COALESCE($8, notes)
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(event_id)
        .bind(event_type)
        .bind(event_date)
        .bind(gestation_diagnosis_result)
        .bind(expected_delivery_date)
        .bind(actual_delivery_date)
        .bind(number_of_offspring)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a reproductive event, removing its offspring links first.
    pub async fn delete(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_reproductive_event");
        tracing::debug!(event_id = %event_id, "deleting reproductive event");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM offspring_born WHERE reproductive_event_id = $1
            "#,
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM reproductive_events WHERE id = $1
            "#,
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Link an offspring animal to an event. The schema enforces at most one
    /// link per (event, animal) pair.
    pub async fn add_offspring(
        &self,
        event_id: Uuid,
        offspring_animal_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("add_reproductive_event_offspring");
        tracing::debug!(event_id = %event_id, offspring_animal_id = %offspring_animal_id, "linking offspring");
        sqlx::query(
            r#"
            INSERT INTO offspring_born (reproductive_event_id, offspring_animal_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(event_id)
        .bind(offspring_animal_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Unlink an offspring animal from an event.
    pub async fn remove_offspring(
        &self,
        event_id: Uuid,
        offspring_animal_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_reproductive_event_offspring");
        tracing::debug!(event_id = %event_id, offspring_animal_id = %offspring_animal_id, "unlinking offspring");
        let result = sqlx::query(
            r#"
            DELETE FROM offspring_born
            WHERE reproductive_event_id = $1 AND offspring_animal_id = $2
            "#,
        )
        .bind(event_id)
        .bind(offspring_animal_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: ReproductiveEventRepository tests require a database connection and are covered by integration tests
}
