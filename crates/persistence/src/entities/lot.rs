//! Lot entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the lots table.
#[derive(Debug, Clone, FromRow)]
pub struct LotEntity {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LotEntity> for domain::models::Lot {
    fn from(entity: LotEntity) -> Self {
        Self {
            id: entity.id,
            farm_id: entity.farm_id,
            name: entity.name,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
