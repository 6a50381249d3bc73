//! Group entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the grupos table.
#[derive(Debug, Clone, FromRow)]
pub struct GrupoEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub purpose_id: Option<Uuid>,
    pub created_by_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GrupoEntity> for domain::models::Grupo {
    fn from(entity: GrupoEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            purpose_id: entity.purpose_id,
            created_by_user_id: entity.created_by_user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the animal_grupo_memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupMembershipEntity {
    pub animal_id: Uuid,
    pub grupo_id: Uuid,
    pub assigned_date: NaiveDate,
    pub removed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<GroupMembershipEntity> for domain::models::GroupMembership {
    fn from(entity: GroupMembershipEntity) -> Self {
        Self {
            animal_id: entity.animal_id,
            grupo_id: entity.grupo_id,
            assigned_date: entity.assigned_date,
            removed_date: entity.removed_date,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
