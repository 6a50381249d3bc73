//! Reproductive event domain models.
//!
//! A reproductive event belongs to one dam and may reference a sire. Births
//! link the resulting animals through offspring records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Kind of reproductive event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReproductiveEventType {
    Mating,
    ArtificialInsemination,
    GestationDiagnosis,
    Birth,
    Abortion,
    Weaning,
    ReproductiveEvaluation,
}

impl ReproductiveEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReproductiveEventType::Mating => "mating",
            ReproductiveEventType::ArtificialInsemination => "artificial_insemination",
            ReproductiveEventType::GestationDiagnosis => "gestation_diagnosis",
            ReproductiveEventType::Birth => "birth",
            ReproductiveEventType::Abortion => "abortion",
            ReproductiveEventType::Weaning => "weaning",
            ReproductiveEventType::ReproductiveEvaluation => "reproductive_evaluation",
        }
    }
}

impl FromStr for ReproductiveEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mating" => Ok(ReproductiveEventType::Mating),
            "artificial_insemination" => Ok(ReproductiveEventType::ArtificialInsemination),
            "gestation_diagnosis" => Ok(ReproductiveEventType::GestationDiagnosis),
            "birth" => Ok(ReproductiveEventType::Birth),
            "abortion" => Ok(ReproductiveEventType::Abortion),
            "weaning" => Ok(ReproductiveEventType::Weaning),
            "reproductive_evaluation" => Ok(ReproductiveEventType::ReproductiveEvaluation),
            _ => Err(format!("Invalid reproductive event type: {}", s)),
        }
    }
}

impl fmt::Display for ReproductiveEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a gestation diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestationDiagnosisResult {
    Pregnant,
    Open,
    NotApplicable,
}

impl GestationDiagnosisResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestationDiagnosisResult::Pregnant => "pregnant",
            GestationDiagnosisResult::Open => "open",
            GestationDiagnosisResult::NotApplicable => "not_applicable",
        }
    }
}

impl FromStr for GestationDiagnosisResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pregnant" => Ok(GestationDiagnosisResult::Pregnant),
            "open" => Ok(GestationDiagnosisResult::Open),
            "not_applicable" => Ok(GestationDiagnosisResult::NotApplicable),
            _ => Err(format!("Invalid gestation diagnosis result: {}", s)),
        }
    }
}

impl fmt::Display for GestationDiagnosisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reproductive event for one dam. The dam and sire are fixed at creation;
/// offspring records accumulate against birth events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReproductiveEvent {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub event_type: ReproductiveEventType,
    pub event_date: NaiveDate,
    pub sire_animal_id: Option<Uuid>,
    pub gestation_diagnosis_result: Option<GestationDiagnosisResult>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub actual_delivery_date: Option<NaiveDate>,
    pub number_of_offspring: Option<i32>,
    pub notes: Option<String>,
    /// Animals linked as offspring of this event.
    pub offspring_animal_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a reproductive event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateReproductiveEventRequest {
    pub animal_id: Uuid,
    pub event_type: ReproductiveEventType,
    pub event_date: NaiveDate,
    pub sire_animal_id: Option<Uuid>,
    pub gestation_diagnosis_result: Option<GestationDiagnosisResult>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub actual_delivery_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Offspring count cannot be negative"))]
    pub number_of_offspring: Option<i32>,

    pub notes: Option<String>,
}

/// Request payload for updating a reproductive event. The dam and sire are
/// fixed at creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateReproductiveEventRequest {
    pub event_type: Option<ReproductiveEventType>,
    pub event_date: Option<NaiveDate>,
    pub gestation_diagnosis_result: Option<GestationDiagnosisResult>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub actual_delivery_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Offspring count cannot be negative"))]
    pub number_of_offspring: Option<i32>,

    pub notes: Option<String>,
}

/// Request payload for linking an offspring animal to a reproductive event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordOffspringRequest {
    pub offspring_animal_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trip() {
        assert_eq!(
            "artificial_insemination".parse::<ReproductiveEventType>().unwrap(),
            ReproductiveEventType::ArtificialInsemination
        );
        assert_eq!(ReproductiveEventType::Birth.to_string(), "birth");
        assert!("cloning".parse::<ReproductiveEventType>().is_err());
    }

    #[test]
    fn test_diagnosis_result_round_trip() {
        assert_eq!(
            "pregnant".parse::<GestationDiagnosisResult>().unwrap(),
            GestationDiagnosisResult::Pregnant
        );
        assert_eq!(GestationDiagnosisResult::NotApplicable.to_string(), "not_applicable");
        assert!("maybe".parse::<GestationDiagnosisResult>().is_err());
    }
}
