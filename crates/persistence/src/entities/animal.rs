//! Animal entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::animal::{AnimalOrigin, AnimalStatus, Sex};
use domain::services::AnimalFacts;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for animal_sex that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "animal_sex", rename_all = "lowercase")]
pub enum SexDb {
    Female,
    Male,
}

impl From<SexDb> for Sex {
    fn from(db: SexDb) -> Self {
        match db {
            SexDb::Female => Sex::Female,
            SexDb::Male => Sex::Male,
        }
    }
}

impl From<Sex> for SexDb {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Female => SexDb::Female,
            Sex::Male => SexDb::Male,
        }
    }
}

/// Database enum for animal_status that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "animal_status", rename_all = "lowercase")]
pub enum AnimalStatusDb {
    Active,
    Sold,
    Deceased,
}

impl From<AnimalStatusDb> for AnimalStatus {
    fn from(db: AnimalStatusDb) -> Self {
        match db {
            AnimalStatusDb::Active => AnimalStatus::Active,
            AnimalStatusDb::Sold => AnimalStatus::Sold,
            AnimalStatusDb::Deceased => AnimalStatus::Deceased,
        }
    }
}

impl From<AnimalStatus> for AnimalStatusDb {
    fn from(status: AnimalStatus) -> Self {
        match status {
            AnimalStatus::Active => AnimalStatusDb::Active,
            AnimalStatus::Sold => AnimalStatusDb::Sold,
            AnimalStatus::Deceased => AnimalStatusDb::Deceased,
        }
    }
}

/// Database enum for animal_origin that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "animal_origin", rename_all = "lowercase")]
pub enum AnimalOriginDb {
    Born,
    Purchased,
}

impl From<AnimalOriginDb> for AnimalOrigin {
    fn from(db: AnimalOriginDb) -> Self {
        match db {
            AnimalOriginDb::Born => AnimalOrigin::Born,
            AnimalOriginDb::Purchased => AnimalOrigin::Purchased,
        }
    }
}

impl From<AnimalOrigin> for AnimalOriginDb {
    fn from(origin: AnimalOrigin) -> Self {
        match origin {
            AnimalOrigin::Born => AnimalOriginDb::Born,
            AnimalOrigin::Purchased => AnimalOriginDb::Purchased,
        }
    }
}

/// Database row mapping for the animals table.
#[derive(Debug, Clone, FromRow)]
pub struct AnimalEntity {
    pub id: Uuid,
    pub tag_id: String,
    pub name: Option<String>,
    pub species_id: Option<Uuid>,
    pub breed_id: Option<Uuid>,
    pub sex: SexDb,
    pub date_of_birth: Option<NaiveDate>,
    pub current_status: AnimalStatusDb,
    pub origin: AnimalOriginDb,
    pub owner_user_id: Uuid,
    pub mother_animal_id: Option<Uuid>,
    pub father_animal_id: Option<Uuid>,
    pub description: Option<String>,
    pub current_lot_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnimalEntity> for domain::models::Animal {
    fn from(entity: AnimalEntity) -> Self {
        Self {
            id: entity.id,
            tag_id: entity.tag_id,
            name: entity.name,
            species_id: entity.species_id,
            breed_id: entity.breed_id,
            sex: entity.sex.into(),
            date_of_birth: entity.date_of_birth,
            current_status: entity.current_status.into(),
            origin: entity.origin.into(),
            owner_user_id: entity.owner_user_id,
            mother_animal_id: entity.mother_animal_id,
            father_animal_id: entity.father_animal_id,
            description: entity.description,
            current_lot_id: entity.current_lot_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Authorization facts for one animal, with the farm resolved through the
/// animal's current lot in a single join.
#[derive(Debug, Clone, FromRow)]
pub struct AnimalFactsEntity {
    pub owner_user_id: Uuid,
    pub current_lot_id: Option<Uuid>,
    pub farm_id: Option<Uuid>,
}

impl From<AnimalFactsEntity> for AnimalFacts {
    fn from(entity: AnimalFactsEntity) -> Self {
        Self {
            owner_user_id: entity.owner_user_id,
            current_lot_id: entity.current_lot_id,
            farm_id: entity.farm_id,
        }
    }
}

/// Parent references for one animal, used to build the pedigree index.
#[derive(Debug, Clone, FromRow)]
pub struct ParentRefEntity {
    pub id: Uuid,
    pub mother_animal_id: Option<Uuid>,
    pub father_animal_id: Option<Uuid>,
}

/// Database row mapping for the animal_location_history table.
#[derive(Debug, Clone, FromRow)]
pub struct LocationHistoryEntity {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub farm_id: Uuid,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LocationHistoryEntity> for domain::models::LocationHistoryEntry {
    fn from(entity: LocationHistoryEntity) -> Self {
        Self {
            id: entity.id,
            animal_id: entity.animal_id,
            farm_id: entity.farm_id,
            entry_date: entity.entry_date,
            exit_date: entity.exit_date,
            reason: entity.reason,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
