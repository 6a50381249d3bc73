//! Health event entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::health_event::HealthEventType;
use domain::models::HealthEvent;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for health_event_type that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "health_event_type", rename_all = "lowercase")]
pub enum HealthEventTypeDb {
    Vaccination,
    Treatment,
    Deworming,
    Checkup,
}

impl From<HealthEventTypeDb> for HealthEventType {
    fn from(db: HealthEventTypeDb) -> Self {
        match db {
            HealthEventTypeDb::Vaccination => HealthEventType::Vaccination,
            HealthEventTypeDb::Treatment => HealthEventType::Treatment,
            HealthEventTypeDb::Deworming => HealthEventType::Deworming,
            HealthEventTypeDb::Checkup => HealthEventType::Checkup,
        }
    }
}

impl From<HealthEventType> for HealthEventTypeDb {
    fn from(kind: HealthEventType) -> Self {
        match kind {
            HealthEventType::Vaccination => HealthEventTypeDb::Vaccination,
            HealthEventType::Treatment => HealthEventTypeDb::Treatment,
            HealthEventType::Deworming => HealthEventTypeDb::Deworming,
            HealthEventType::Checkup => HealthEventTypeDb::Checkup,
        }
    }
}

/// Database row mapping for the health_events table. Affected animals live
/// in the health_event_animals pivot and are joined in by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct HealthEventEntity {
    pub id: Uuid,
    pub event_type: HealthEventTypeDb,
    pub event_date: NaiveDate,
    pub product_id: Option<Uuid>,
    pub dosage: Option<String>,
    pub administered_by_user_id: Uuid,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HealthEventEntity {
    /// Assemble the domain model with the pivot rows fetched separately.
    pub fn into_model(self, animal_ids: Vec<Uuid>) -> HealthEvent {
        HealthEvent {
            id: self.id,
            event_type: self.event_type.into(),
            event_date: self.event_date,
            product_id: self.product_id,
            dosage: self.dosage,
            administered_by_user_id: self.administered_by_user_id,
            diagnosis: self.diagnosis,
            notes: self.notes,
            animal_ids,
            created_at: self.created_at,
        }
    }
}
