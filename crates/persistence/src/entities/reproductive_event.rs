//! Reproductive event entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::reproductive_event::{GestationDiagnosisResult, ReproductiveEventType};
use domain::models::ReproductiveEvent;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for reproductive_event_type that maps to the PostgreSQL
/// enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reproductive_event_type", rename_all = "snake_case")]
pub enum ReproductiveEventTypeDb {
    Mating,
    ArtificialInsemination,
    GestationDiagnosis,
    Birth,
    Abortion,
    Weaning,
    ReproductiveEvaluation,
}

impl From<ReproductiveEventTypeDb> for ReproductiveEventType {
    fn from(db: ReproductiveEventTypeDb) -> Self {
        match db {
            ReproductiveEventTypeDb::Mating => ReproductiveEventType::Mating,
            ReproductiveEventTypeDb::ArtificialInsemination => {
                ReproductiveEventType::ArtificialInsemination
            }
            ReproductiveEventTypeDb::GestationDiagnosis => {
                ReproductiveEventType::GestationDiagnosis
            }
            ReproductiveEventTypeDb::Birth => ReproductiveEventType::Birth,
            ReproductiveEventTypeDb::Abortion => ReproductiveEventType::Abortion,
            ReproductiveEventTypeDb::Weaning => ReproductiveEventType::Weaning,
            ReproductiveEventTypeDb::ReproductiveEvaluation => {
                ReproductiveEventType::ReproductiveEvaluation
            }
        }
    }
}

impl From<ReproductiveEventType> for ReproductiveEventTypeDb {
    fn from(kind: ReproductiveEventType) -> Self {
        match kind {
            ReproductiveEventType::Mating => ReproductiveEventTypeDb::Mating,
            ReproductiveEventType::ArtificialInsemination => {
                ReproductiveEventTypeDb::ArtificialInsemination
            }
            ReproductiveEventType::GestationDiagnosis => {
                ReproductiveEventTypeDb::GestationDiagnosis
            }
            ReproductiveEventType::Birth => ReproductiveEventTypeDb::Birth,
            ReproductiveEventType::Abortion => ReproductiveEventTypeDb::Abortion,
            ReproductiveEventType::Weaning => ReproductiveEventTypeDb::Weaning,
            ReproductiveEventType::ReproductiveEvaluation => {
                ReproductiveEventTypeDb::ReproductiveEvaluation
            }
        }
    }
}

/// Database enum for gestation_diagnosis_result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "gestation_diagnosis_result", rename_all = "snake_case")]
pub enum GestationDiagnosisResultDb {
    Pregnant,
    Open,
    NotApplicable,
}

impl From<GestationDiagnosisResultDb> for GestationDiagnosisResult {
    fn from(db: GestationDiagnosisResultDb) -> Self {
        match db {
            GestationDiagnosisResultDb::Pregnant => GestationDiagnosisResult::Pregnant,
            GestationDiagnosisResultDb::Open => GestationDiagnosisResult::Open,
            GestationDiagnosisResultDb::NotApplicable => GestationDiagnosisResult::NotApplicable,
        }
    }
}

impl From<GestationDiagnosisResult> for GestationDiagnosisResultDb {
    fn from(result: GestationDiagnosisResult) -> Self {
        match result {
            GestationDiagnosisResult::Pregnant => GestationDiagnosisResultDb::Pregnant,
            GestationDiagnosisResult::Open => GestationDiagnosisResultDb::Open,
            GestationDiagnosisResult::NotApplicable => GestationDiagnosisResultDb::NotApplicable,
        }
    }
}

/// Database row mapping for the reproductive_events table. Offspring links
/// live in the offspring_born table and are joined in by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct ReproductiveEventEntity {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub event_type: ReproductiveEventTypeDb,
    pub event_date: NaiveDate,
    pub sire_animal_id: Option<Uuid>,
    pub gestation_diagnosis_result: Option<GestationDiagnosisResultDb>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub actual_delivery_date: Option<NaiveDate>,
    pub number_of_offspring: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReproductiveEventEntity {
    /// Assemble the domain model with the offspring links fetched separately.
    pub fn into_model(self, offspring_animal_ids: Vec<Uuid>) -> ReproductiveEvent {
        ReproductiveEvent {
            id: self.id,
            animal_id: self.animal_id,
            event_type: self.event_type.into(),
            event_date: self.event_date,
            sire_animal_id: self.sire_animal_id,
            gestation_diagnosis_result: self.gestation_diagnosis_result.map(Into::into),
            expected_delivery_date: self.expected_delivery_date,
            actual_delivery_date: self.actual_delivery_date,
            number_of_offspring: self.number_of_offspring,
            notes: self.notes,
            offspring_animal_ids,
            created_at: self.created_at,
        }
    }
}
