//! Animal repository for database operations.
//!
//! Carries the fact queries the access resolver and consistency checker
//! depend on: owner/lot/farm facts joined in one query, parent references
//! for the pedigree index, and the animal's location history rows.

use chrono::NaiveDate;
use domain::services::AnimalScope;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    AnimalEntity, AnimalFactsEntity, AnimalOriginDb, AnimalStatusDb, LocationHistoryEntity,
    ParentRefEntity, SexDb,
};
use crate::metrics::QueryTimer;

const ANIMAL_COLUMNS: &str = "id, tag_id, name, species_id, breed_id, sex, date_of_birth, \
     current_status, origin, owner_user_id, mother_animal_id, father_animal_id, description, \
     current_lot_id, created_at, updated_at";

/// Repository for animal-related database operations.
#[derive(Clone)]
pub struct AnimalRepository {
    pool: PgPool,
}

impl AnimalRepository {
    /// Creates a new AnimalRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new animal owned by the given user.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        tag_id: &str,
        name: Option<&str>,
        species_id: Option<Uuid>,
        breed_id: Option<Uuid>,
        sex: SexDb,
        date_of_birth: Option<NaiveDate>,
        current_status: AnimalStatusDb,
        origin: AnimalOriginDb,
        owner_user_id: Uuid,
        mother_animal_id: Option<Uuid>,
        father_animal_id: Option<Uuid>,
        description: Option<&str>,
        current_lot_id: Option<Uuid>,
    ) -> Result<AnimalEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_animal");
        tracing::debug!(tag_id = %tag_id, owner_user_id = %owner_user_id, "inserting animal");
        let result = sqlx::query_as::<_, AnimalEntity>(&format!(
            r#"
            INSERT INTO animals (tag_id, name, species_id, breed_id, sex, date_of_birth,
                current_status, origin, owner_user_id, mother_animal_id, father_animal_id,
                description, current_lot_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ANIMAL_COLUMNS}
            "#,
        ))
        .bind(tag_id)
        .bind(name)
        .bind(species_id)
        .bind(breed_id)
        .bind(sex)
        .bind(date_of_birth)
        .bind(current_status)
        .bind(origin)
        .bind(owner_user_id)
        .bind(mother_animal_id)
        .bind(father_animal_id)
        .bind(description)
        .bind(current_lot_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an animal by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AnimalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_animal_by_id");
        let result = sqlx::query_as::<_, AnimalEntity>(&format!(
            r#"
            SELECT {ANIMAL_COLUMNS}
            FROM animals
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch the authorization facts for one animal, resolving the farm
    /// through the current lot.
    pub async fn find_facts(&self, id: Uuid) -> Result<Option<AnimalFactsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_animal_facts");
        let result = sqlx::query_as::<_, AnimalFactsEntity>(
            r#"
            SELECT a.owner_user_id, a.current_lot_id, l.farm_id
            FROM animals a
            LEFT JOIN lots l ON l.id = a.current_lot_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch authorization facts for every animal in a set, in pivot order
    /// of no particular significance.
    pub async fn find_facts_for_set(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<AnimalFactsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_animal_facts_for_set");
        let result = sqlx::query_as::<_, AnimalFactsEntity>(
            r#"
            SELECT a.owner_user_id, a.current_lot_id, l.farm_id
            FROM animals a
            LEFT JOIN lots l ON l.id = a.current_lot_id
            WHERE a.id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List animals inside the given visibility scope.
    pub async fn list_in_scope(&self, scope: &AnimalScope) -> Result<Vec<AnimalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_animals_in_scope");
        let farm_ids: Vec<Uuid> = scope.farm_ids.iter().copied().collect();
        let result = sqlx::query_as::<_, AnimalEntity>(
            r#"
            SELECT a.id, a.tag_id, a.name, a.species_id, a.breed_id, a.sex, a.date_of_birth,
                   a.current_status, a.origin, a.owner_user_id, a.mother_animal_id,
                   a.father_animal_id, a.description, a.current_lot_id, a.created_at, a.updated_at
            FROM animals a
            LEFT JOIN lots l ON l.id = a.current_lot_id
            WHERE (a.owner_user_id = $1 OR l.farm_id = ANY($2))
              AND ($3::uuid IS NULL OR a.current_lot_id = $3)
            ORDER BY a.tag_id
            "#,
        )
        .bind(scope.owner_user_id)
        .bind(&farm_ids)
        .bind(scope.lot_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List every animal's parent references, for building the pedigree
    /// index that bounds ancestor walks.
    pub async fn list_parent_refs(&self) -> Result<Vec<ParentRefEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_animal_parent_refs");
        let result = sqlx::query_as::<_, ParentRefEntity>(
            r#"
            SELECT id, mother_animal_id, father_animal_id
            FROM animals
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an animal. Ownership is never updated.
    ///
    /// The nullable lot and parent references take a double-`Option`: the
    /// outer level distinguishes "leave unchanged" from "write this value",
    /// so an explicit inner `None` clears the column back to NULL.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        animal_id: Uuid,
        name: Option<&str>,
        species_id: Option<Uuid>,
        breed_id: Option<Uuid>,
        date_of_birth: Option<NaiveDate>,
        current_status: Option<AnimalStatusDb>,
        mother_animal_id: Option<Option<Uuid>>,
        father_animal_id: Option<Option<Uuid>>,
        description: Option<&str>,
        current_lot_id: Option<Option<Uuid>>,
    ) -> Result<AnimalEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_animal");
        tracing::debug!(animal_id = %animal_id, "updating animal");
        let result = sqlx::query_as::<_, AnimalEntity>(&format!(
            r#"
            UPDATE animals
            SET
                name = COALESCE($2, name),
                species_id = COALESCE($3, species_id),
                breed_id = COALESCE($4, breed_id),
                date_of_birth = COALESCE($5, date_of_birth),
                current_status = COALESCE($6, current_status),
                mother_animal_id = CASE WHEN $7 THEN $8::uuid ELSE mother_animal_id END,
                father_animal_id = CASE WHEN $9 THEN $10::uuid ELSE father_animal_id END,
                description = COALESCE($11, description),
                current_lot_id = CASE WHEN $12 THEN $13::uuid ELSE current_lot_id END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ANIMAL_COLUMNS}
            "#,
        ))
        .bind(animal_id)
        .bind(name)
        .bind(species_id)
        .bind(breed_id)
        .bind(date_of_birth)
        .bind(current_status)
        .bind(mother_animal_id.is_some())
        .bind(mother_animal_id.flatten())
        .bind(father_animal_id.is_some())
        .bind(father_animal_id.flatten())
        .bind(description)
        .bind(current_lot_id.is_some())
        .bind(current_lot_id.flatten())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an animal. Pivot rows, memberships and history cascade at the
    /// schema level.
    pub async fn delete(&self, animal_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_animal");
        tracing::debug!(animal_id = %animal_id, "deleting animal");
        let result = sqlx::query(
            r#"
            DELETE FROM animals WHERE id = $1
            "#,
        )
        .bind(animal_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List an animal's location history, newest entry first.
    pub async fn list_location_history(
        &self,
        animal_id: Uuid,
    ) -> Result<Vec<LocationHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_animal_location_history");
        let result = sqlx::query_as::<_, LocationHistoryEntity>(
            r#"
            SELECT id, animal_id, farm_id, entry_date, exit_date, reason, notes, created_at
            FROM animal_location_history
            WHERE animal_id = $1
            ORDER BY entry_date DESC
            "#,
        )
        .bind(animal_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the animal's open location row (no exit date), if any.
    pub async fn find_open_location(
        &self,
        animal_id: Uuid,
    ) -> Result<Option<LocationHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_open_animal_location");
        let result = sqlx::query_as::<_, LocationHistoryEntity>(
            r#"
            SELECT id, animal_id, farm_id, entry_date, exit_date, reason, notes, created_at
            FROM animal_location_history
            WHERE animal_id = $1 AND exit_date IS NULL
            ORDER BY entry_date DESC
            LIMIT 1
            "#,
        )
        .bind(animal_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record a location entry, closing the superseded open row in the same
    /// transaction.
    pub async fn record_location_entry(
        &self,
        animal_id: Uuid,
        farm_id: Uuid,
        entry_date: NaiveDate,
        reason: Option<&str>,
        notes: Option<&str>,
    ) -> Result<LocationHistoryEntity, sqlx::Error> {
        let timer = QueryTimer::new("record_location_entry");
        tracing::debug!(animal_id = %animal_id, farm_id = %farm_id, "recording location entry");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE animal_location_history
            SET exit_date = $2
            WHERE animal_id = $1 AND exit_date IS NULL
            "#,
        )
        .bind(animal_id)
        .bind(entry_date)
        .execute(&mut *tx)
        .await?;

        let entry = sqlx::query_as::<_, LocationHistoryEntity>(
            r#"
            INSERT INTO animal_location_history (animal_id, farm_id, entry_date, reason, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, animal_id, farm_id, entry_date, exit_date, reason, notes, created_at
            "#,
        )
        .bind(animal_id)
        .bind(farm_id)
        .bind(entry_date)
        .bind(reason)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entry)
    }

    /// Check whether a tag ID is already in use.
    pub async fn tag_exists(&self, tag_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_animal_tag_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM animals WHERE tag_id = $1)
            "#,
        )
        .bind(tag_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: AnimalRepository tests require a database connection and are covered by integration tests
}
