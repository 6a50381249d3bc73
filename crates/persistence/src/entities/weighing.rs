//! Weighing entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::Weighing;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the weighings table.
#[derive(Debug, Clone, FromRow)]
pub struct WeighingEntity {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub weighing_date: NaiveDate,
    pub weight_kg: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<WeighingEntity> for Weighing {
    fn from(entity: WeighingEntity) -> Self {
        Weighing {
            id: entity.id,
            animal_id: entity.animal_id,
            weighing_date: entity.weighing_date,
            weight_kg: entity.weight_kg,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
