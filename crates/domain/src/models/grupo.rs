//! Dynamic animal group domain models.
//!
//! Groups collect animals for events and procedures (a deworming batch, a
//! weaning cohort). Visibility is creator-scoped, not farm-scoped: no
//! sharing mechanism exists for groups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A dynamic animal group with exactly one creating user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Grupo {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub purpose_id: Option<Uuid>,
    pub created_by_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Temporal membership of an animal in a group. At most one active row
/// (null `removed_date`) may exist per `(animal_id, grupo_id)` pair;
/// historical rows may repeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupMembership {
    pub animal_id: Uuid,
    pub grupo_id: Uuid,
    pub assigned_date: NaiveDate,
    pub removed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GroupMembership {
    /// Whether the membership is currently active.
    pub fn is_active(&self) -> bool {
        self.removed_date.is_none()
    }
}

/// Request payload for creating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGrupoRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,
    pub purpose_id: Option<Uuid>,
}

/// Request payload for updating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateGrupoRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub purpose_id: Option<Uuid>,
}

/// Request payload for assigning an animal to a group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignMembershipRequest {
    pub animal_id: Uuid,
    pub assigned_date: NaiveDate,
    pub removed_date: Option<NaiveDate>,
    pub notes: Option<String>,
}
