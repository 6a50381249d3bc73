//! Animal domain models.
//!
//! Animals form a self-referencing pedigree graph through their mother and
//! father references, and resolve to a farm indirectly through their current
//! lot. Both shapes carry invariants enforced by the consistency service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_tag_id;

/// Biological sex of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "female" => Ok(Sex::Female),
            "male" => Ok(Sex::Male),
            _ => Err(format!("Invalid sex: {}", s)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current lifecycle status of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalStatus {
    Active,
    Sold,
    Deceased,
}

impl AnimalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalStatus::Active => "active",
            AnimalStatus::Sold => "sold",
            AnimalStatus::Deceased => "deceased",
        }
    }
}

impl FromStr for AnimalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AnimalStatus::Active),
            "sold" => Ok(AnimalStatus::Sold),
            "deceased" => Ok(AnimalStatus::Deceased),
            _ => Err(format!("Invalid animal status: {}", s)),
        }
    }
}

impl fmt::Display for AnimalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an animal entered the herd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalOrigin {
    Born,
    Purchased,
}

impl AnimalOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalOrigin::Born => "born",
            AnimalOrigin::Purchased => "purchased",
        }
    }
}

impl FromStr for AnimalOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "born" => Ok(AnimalOrigin::Born),
            "purchased" => Ok(AnimalOrigin::Purchased),
            _ => Err(format!("Invalid animal origin: {}", s)),
        }
    }
}

impl fmt::Display for AnimalOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An animal. Has exactly one owner; its farm is derived through
/// `current_lot_id` and may be absent when the animal is not placed in a lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Animal {
    pub id: Uuid,
    pub tag_id: String,
    pub name: Option<String>,
    pub species_id: Option<Uuid>,
    pub breed_id: Option<Uuid>,
    pub sex: Sex,
    pub date_of_birth: Option<NaiveDate>,
    pub current_status: AnimalStatus,
    pub origin: AnimalOrigin,
    pub owner_user_id: Uuid,
    pub mother_animal_id: Option<Uuid>,
    pub father_animal_id: Option<Uuid>,
    pub description: Option<String>,
    pub current_lot_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of an animal's farm location history. Unique per
/// `(animal_id, farm_id, entry_date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LocationHistoryEntry {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub farm_id: Uuid,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating an animal.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateAnimalRequest {
    #[validate(custom(function = "validate_tag_id"))]
    pub tag_id: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    pub species_id: Option<Uuid>,
    pub breed_id: Option<Uuid>,
    pub sex: Sex,
    pub date_of_birth: Option<NaiveDate>,
    pub current_status: AnimalStatus,
    pub origin: AnimalOrigin,
    pub mother_animal_id: Option<Uuid>,
    pub father_animal_id: Option<Uuid>,
    pub description: Option<String>,
    pub current_lot_id: Option<Uuid>,
}

/// Deserializes a field that distinguishes "absent" from an explicit JSON
/// null: `None` means the field was omitted, `Some(None)` means null.
fn nullable_field<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

/// Request payload for updating an animal. Ownership is never updatable.
///
/// The lot and parent references are nullable columns; their fields use the
/// double-`Option` shape so a request can clear them with an explicit null
/// while an omitted field leaves the stored value alone.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateAnimalRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    pub species_id: Option<Uuid>,
    pub breed_id: Option<Uuid>,
    pub date_of_birth: Option<NaiveDate>,
    pub current_status: Option<AnimalStatus>,

    #[serde(default, deserialize_with = "nullable_field")]
    pub mother_animal_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "nullable_field")]
    pub father_animal_id: Option<Option<Uuid>>,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "nullable_field")]
    pub current_lot_id: Option<Option<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_round_trip() {
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(Sex::Male.to_string(), "male");
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("sold".parse::<AnimalStatus>().unwrap(), AnimalStatus::Sold);
        assert_eq!(AnimalStatus::Deceased.to_string(), "deceased");
        assert!("retired".parse::<AnimalStatus>().is_err());
    }

    #[test]
    fn test_origin_round_trip() {
        assert_eq!("born".parse::<AnimalOrigin>().unwrap(), AnimalOrigin::Born);
        assert_eq!(AnimalOrigin::Purchased.to_string(), "purchased");
    }

    #[test]
    fn test_update_request_distinguishes_omitted_from_null() {
        let omitted: UpdateAnimalRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(omitted.current_lot_id, None);
        assert_eq!(omitted.mother_animal_id, None);

        let cleared: UpdateAnimalRequest = serde_json::from_str(
            r#"{"current_lot_id": null, "mother_animal_id": null}"#,
        )
        .unwrap();
        assert_eq!(cleared.current_lot_id, Some(None));
        assert_eq!(cleared.mother_animal_id, Some(None));
        assert_eq!(cleared.father_animal_id, None);
    }

    #[test]
    fn test_update_request_set_value_parses() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"current_lot_id": "{}"}}"#, id);
        let request: UpdateAnimalRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.current_lot_id, Some(Some(id)));
    }
}
