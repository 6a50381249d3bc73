//! Health event domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Kind of health event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthEventType {
    Vaccination,
    Treatment,
    Deworming,
    Checkup,
}

impl HealthEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthEventType::Vaccination => "vaccination",
            HealthEventType::Treatment => "treatment",
            HealthEventType::Deworming => "deworming",
            HealthEventType::Checkup => "checkup",
        }
    }
}

impl FromStr for HealthEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vaccination" => Ok(HealthEventType::Vaccination),
            "treatment" => Ok(HealthEventType::Treatment),
            "deworming" => Ok(HealthEventType::Deworming),
            "checkup" => Ok(HealthEventType::Checkup),
            _ => Err(format!("Invalid health event type: {}", s)),
        }
    }
}

impl fmt::Display for HealthEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A health event applied to one or more animals through a pivot table.
/// Carries exactly one administering user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthEvent {
    pub id: Uuid,
    pub event_type: HealthEventType,
    pub event_date: NaiveDate,
    pub product_id: Option<Uuid>,
    pub dosage: Option<String>,
    pub administered_by_user_id: Uuid,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    /// Animals linked through the pivot table.
    pub animal_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a health event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateHealthEventRequest {
    pub event_type: HealthEventType,
    pub event_date: NaiveDate,
    pub product_id: Option<Uuid>,

    #[validate(length(max = 100, message = "Dosage must be at most 100 characters"))]
    pub dosage: Option<String>,

    pub diagnosis: Option<String>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "At least one animal_id must be provided"))]
    pub animal_ids: Vec<Uuid>,
}

/// Request payload for updating a health event. The affected-animal set is
/// fixed at creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateHealthEventRequest {
    pub event_type: Option<HealthEventType>,
    pub event_date: Option<NaiveDate>,
    pub product_id: Option<Uuid>,

    #[validate(length(max = 100, message = "Dosage must be at most 100 characters"))]
    pub dosage: Option<String>,

    pub diagnosis: Option<String>,
    pub notes: Option<String>,
}
