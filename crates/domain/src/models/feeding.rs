//! Feeding domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_quantity_kg;

/// A feeding applied to one or more animals through a pivot table.
/// Carries exactly one administering user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Feeding {
    pub id: Uuid,
    pub feeding_date: NaiveDate,
    pub feed_type_id: Uuid,
    pub quantity_kg: f64,
    pub supplement_id: Option<Uuid>,
    pub administered_by_user_id: Uuid,
    pub notes: Option<String>,
    /// Animals linked through the pivot table.
    pub animal_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a feeding.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateFeedingRequest {
    pub feeding_date: NaiveDate,
    pub feed_type_id: Uuid,

    #[validate(custom(function = "validate_quantity_kg"))]
    pub quantity_kg: f64,

    pub supplement_id: Option<Uuid>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "At least one animal_id must be provided"))]
    pub animal_ids: Vec<Uuid>,
}

/// Request payload for updating a feeding.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateFeedingRequest {
    pub feeding_date: Option<NaiveDate>,
    pub feed_type_id: Option<Uuid>,

    #[validate(custom(function = "validate_quantity_kg"))]
    pub quantity_kg: Option<f64>,

    pub supplement_id: Option<Uuid>,
    pub notes: Option<String>,
}
