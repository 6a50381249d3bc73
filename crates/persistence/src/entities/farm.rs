//! Farm and farm access grant entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::services::GrantFact;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the farms table.
#[derive(Debug, Clone, FromRow)]
pub struct FarmEntity {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area_hectares: Option<f64>,
    pub owner_user_id: Uuid,
    pub contact_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FarmEntity> for domain::models::Farm {
    fn from(entity: FarmEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            location: entity.location,
            latitude: entity.latitude,
            longitude: entity.longitude,
            area_hectares: entity.area_hectares,
            owner_user_id: entity.owner_user_id,
            contact_info: entity.contact_info,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the farm_access_grants table.
#[derive(Debug, Clone, FromRow)]
pub struct FarmAccessGrantEntity {
    pub user_id: Uuid,
    pub farm_id: Uuid,
    pub granted_by_user_id: Uuid,
    pub granted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<FarmAccessGrantEntity> for domain::models::FarmAccessGrant {
    fn from(entity: FarmAccessGrantEntity) -> Self {
        Self {
            user_id: entity.user_id,
            farm_id: entity.farm_id,
            granted_by_user_id: entity.granted_by_user_id,
            granted_at: entity.granted_at,
            expires_at: entity.expires_at,
        }
    }
}

/// Reduced grant row fed to the access resolver.
#[derive(Debug, Clone, FromRow)]
pub struct GrantFactEntity {
    pub farm_id: Uuid,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<GrantFactEntity> for GrantFact {
    fn from(entity: GrantFactEntity) -> Self {
        Self {
            farm_id: entity.farm_id,
            expires_at: entity.expires_at,
        }
    }
}
