//! Feeding entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::Feeding;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the feedings table. Affected animals live in
/// the feeding_animals pivot and are joined in by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct FeedingEntity {
    pub id: Uuid,
    pub feeding_date: NaiveDate,
    pub feed_type_id: Uuid,
    pub quantity_kg: f64,
    pub supplement_id: Option<Uuid>,
    pub administered_by_user_id: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FeedingEntity {
    /// Assemble the domain model with the pivot rows fetched separately.
    pub fn into_model(self, animal_ids: Vec<Uuid>) -> Feeding {
        Feeding {
            id: self.id,
            feeding_date: self.feeding_date,
            feed_type_id: self.feed_type_id,
            quantity_kg: self.quantity_kg,
            supplement_id: self.supplement_id,
            administered_by_user_id: self.administered_by_user_id,
            notes: self.notes,
            animal_ids,
            created_at: self.created_at,
        }
    }
}
