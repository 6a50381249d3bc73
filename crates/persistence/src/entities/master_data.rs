//! Master data entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the master_data table.
#[derive(Debug, Clone, FromRow)]
pub struct MasterDataEntity {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub properties: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_by_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MasterDataEntity> for domain::models::MasterData {
    fn from(entity: MasterDataEntity) -> Self {
        Self {
            id: entity.id,
            category: entity.category,
            name: entity.name,
            description: entity.description,
            properties: entity.properties,
            is_active: entity.is_active,
            created_by_user_id: entity.created_by_user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
