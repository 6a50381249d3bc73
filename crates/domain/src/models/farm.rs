//! Farm and farm-sharing domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_area_hectares, validate_latitude, validate_longitude};

/// A farm. Each farm has exactly one owning user; ownership is immutable
/// after creation (no transfer operation exists).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Farm {
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

/// A shared-access grant for a farm: the association record linking a user
/// to a farm they do not own. Unique per `(user_id, farm_id)`; active iff
/// `expires_at` is null or in the future at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FarmAccessGrant {
    pub user_id: Uuid,
    pub farm_id: Uuid,
    pub granted_by_user_id: Uuid,
    pub granted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl FarmAccessGrant {
    /// Whether the grant is active at the given evaluation time.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expiry| expiry > now)
    }
}

/// Request payload for creating a farm.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateFarmRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(custom(function = "validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "validate_longitude"))]
    pub longitude: Option<f64>,

    #[validate(custom(function = "validate_area_hectares"))]
    pub area_hectares: Option<f64>,

    pub contact_info: Option<String>,
}

/// Request payload for updating a farm. Ownership is never updatable.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateFarmRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(custom(function = "validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "validate_longitude"))]
    pub longitude: Option<f64>,

    #[validate(custom(function = "validate_area_hectares"))]
    pub area_hectares: Option<f64>,

    pub contact_info: Option<String>,
}

/// Request payload for granting shared farm access to another user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GrantFarmAccessRequest {
    pub user_id: Uuid,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(expires_at: Option<DateTime<Utc>>) -> FarmAccessGrant {
        FarmAccessGrant {
            user_id: Uuid::new_v4(),
            farm_id: Uuid::new_v4(),
            granted_by_user_id: Uuid::new_v4(),
            granted_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn test_grant_without_expiry_is_active() {
        assert!(grant(None).is_active(Utc::now()));
    }

    #[test]
    fn test_grant_with_future_expiry_is_active() {
        let now = Utc::now();
        assert!(grant(Some(now + Duration::days(1))).is_active(now));
    }

    #[test]
    fn test_grant_with_past_expiry_is_inactive() {
        let now = Utc::now();
        assert!(!grant(Some(now - Duration::seconds(1))).is_active(now));
    }
}
