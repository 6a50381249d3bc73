//! Weighing domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_quantity_kg;

/// A recorded weight for one animal on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Weighing {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub weighing_date: NaiveDate,
    pub weight_kg: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for recording a weighing.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateWeighingRequest {
    pub animal_id: Uuid,
    pub weighing_date: NaiveDate,

    #[validate(custom(function = "validate_quantity_kg"))]
    pub weight_kg: f64,

    pub notes: Option<String>,
}

/// Request payload for updating a weighing. The animal is fixed at creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateWeighingRequest {
    pub weighing_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_quantity_kg"))]
    pub weight_kg: Option<f64>,

    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_nonpositive_weight() {
        let request = CreateWeighingRequest {
            animal_id: Uuid::new_v4(),
            weighing_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            weight_kg: 0.0,
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_accepts_positive_weight() {
        let request = CreateWeighingRequest {
            animal_id: Uuid::new_v4(),
            weighing_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            weight_kg: 412.5,
            notes: Some("post-weaning".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
