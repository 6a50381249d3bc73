//! Master data domain models.
//!
//! Master data rows are category-scoped reference values: species, breeds,
//! products, feed types, group purposes. References from other entities are
//! validated against the expected category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A master data row, unique per `(category, name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MasterData {
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

impl MasterData {
    /// Whether this row belongs to the expected category.
    pub fn has_category(&self, category: &str) -> bool {
        self.category == category
    }
}

/// Request payload for creating a master data row.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMasterDataRequest {
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,
    pub properties: Option<serde_json::Value>,
}

/// Request payload for updating a master data row.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMasterDataRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub properties: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}
