//! Animal routes.
//!
//! Every handler fetches the animal's authorization facts, asks the access
//! resolver for a decision, and only then touches the entity. Pedigree and
//! location writes additionally run the consistency checks.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use domain::models::animal::{CreateAnimalRequest, UpdateAnimalRequest};
use domain::models::{Animal, LocationHistoryEntry};
use domain::services::{
    authorize_animal_access, authorize_animal_assignment, authorize_parent_reference,
    validate_location_history, validate_parent_assignment, AnimalFacts, DenyReason, FarmAccess,
    LocationRow, LotFacts, LotLookup, Operation, PedigreeIndex,
};
use domain::DomainError;
use persistence::repositories::{AnimalRepository, LotRepository, MasterDataRepository};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Query parameters for listing animals.
#[derive(Debug, Deserialize)]
pub struct ListAnimalsQuery {
    pub farm_id: Option<Uuid>,
    pub lot_id: Option<Uuid>,
}

/// Request payload for recording a location history entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordLocationRequest {
    pub farm_id: Uuid,
    pub entry_date: NaiveDate,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Fetch the animal's facts, failing with 404 when it does not exist.
async fn animal_facts(repo: &AnimalRepository, animal_id: Uuid) -> Result<AnimalFacts, ApiError> {
    let facts = repo
        .find_facts(animal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
    Ok(facts.into())
}

/// Check that a master data reference exists in the expected category.
async fn require_master_data(
    repo: &MasterDataRepository,
    id: Option<Uuid>,
    category: &str,
) -> Result<(), ApiError> {
    if let Some(id) = id {
        if !repo.exists_in_category(id, category).await? {
            return Err(ApiError::NotFound(format!("{} not found", category)));
        }
    }
    Ok(())
}

/// Authorize the mother/father references on a write, then check the
/// proposed assignment against the pedigree graph.
async fn check_parent_references(
    state: &AppState,
    user_id: Uuid,
    animal_id: Uuid,
    mother_id: Option<Uuid>,
    father_id: Option<Uuid>,
) -> Result<(), ApiError> {
    if mother_id.is_none() && father_id.is_none() {
        return Ok(());
    }

    let repo = AnimalRepository::new(state.pool.clone());
    for parent_id in [mother_id, father_id].into_iter().flatten() {
        let parent: Option<AnimalFacts> = repo.find_facts(parent_id).await?.map(Into::into);
        authorize_parent_reference(user_id, parent.as_ref()).require("parent animal")?;
    }

    let mut index = PedigreeIndex::new();
    for row in repo.list_parent_refs().await? {
        index.insert(row.id, row.mother_animal_id, row.father_animal_id);
    }
    validate_parent_assignment(&index, animal_id, mother_id, father_id)
        .map_err(DomainError::from)?;
    Ok(())
}

/// Authorize placing an animal into the requested lot.
async fn check_lot_assignment(
    state: &AppState,
    access: &FarmAccess,
    lot_id: Uuid,
) -> Result<(), ApiError> {
    let repo = LotRepository::new(state.pool.clone());
    let lot = repo
        .find_by_id(lot_id)
        .await?
        .map(|lot| LotFacts { farm_id: lot.farm_id });
    authorize_animal_assignment(access, lot.as_ref()).require("lot")?;
    Ok(())
}

fn deny_to_api(reason: DenyReason, entity: &str) -> ApiError {
    match reason {
        DenyReason::NotFound => ApiError::NotFound(format!("{} not found", entity)),
        DenyReason::Forbidden => ApiError::Forbidden(format!("No access to this {}", entity)),
    }
}

/// Create an animal owned by the caller.
///
/// POST /api/v1/animals
pub async fn create_animal(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateAnimalRequest>,
) -> Result<(StatusCode, Json<Animal>), ApiError> {
    request.validate()?;

    let repo = AnimalRepository::new(state.pool.clone());
    if repo.tag_exists(&request.tag_id).await? {
        return Err(ApiError::Conflict("Tag ID already in use".to_string()));
    }

    let master = MasterDataRepository::new(state.pool.clone());
    require_master_data(&master, request.species_id, "species").await?;
    require_master_data(&master, request.breed_id, "breed").await?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    if let Some(lot_id) = request.current_lot_id {
        check_lot_assignment(&state, &access, lot_id).await?;
    }

    // A new animal cannot yet be anyone's ancestor, so only the ownership
    // rule applies to its parent references here.
    for parent_id in [request.mother_animal_id, request.father_animal_id]
        .into_iter()
        .flatten()
    {
        let parent: Option<AnimalFacts> = repo.find_facts(parent_id).await?.map(Into::into);
        authorize_parent_reference(user_auth.user_id, parent.as_ref()).require("parent animal")?;
    }

    let animal = repo
        .create(
            &request.tag_id,
            request.name.as_deref(),
            request.species_id,
            request.breed_id,
            request.sex.into(),
            request.date_of_birth,
            request.current_status.into(),
            request.origin.into(),
            user_auth.user_id,
            request.mother_animal_id,
            request.father_animal_id,
            request.description.as_deref(),
            request.current_lot_id,
        )
        .await?;

    info!(animal_id = %animal.id, tag_id = %animal.tag_id, user_id = %user_auth.user_id, "Animal created");

    Ok((StatusCode::CREATED, Json(animal.into())))
}

/// List animals visible to the caller, optionally narrowed by farm or lot.
///
/// GET /api/v1/animals?farm_id=...&lot_id=...
pub async fn list_animals(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Query(query): Query<ListAnimalsQuery>,
) -> Result<Json<Vec<Animal>>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;

    let lot_filter = match query.lot_id {
        None => None,
        Some(lot_id) => {
            let repo = LotRepository::new(state.pool.clone());
            let lookup = match repo.find_by_id(lot_id).await? {
                Some(lot) => LotLookup::Found(LotFacts { farm_id: lot.farm_id }),
                None => LotLookup::Missing,
            };
            Some((lot_id, lookup))
        }
    };

    let scope = domain::services::visible_animal_scope(&access, query.farm_id, lot_filter)
        .map_err(|reason| deny_to_api(reason, if query.lot_id.is_some() { "lot" } else { "farm" }))?;

    let repo = AnimalRepository::new(state.pool.clone());
    let animals = repo
        .list_in_scope(&scope)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(animals))
}

/// Get one animal.
///
/// GET /api/v1/animals/:animal_id
pub async fn get_animal(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(animal_id): Path<Uuid>,
) -> Result<Json<Animal>, ApiError> {
    let repo = AnimalRepository::new(state.pool.clone());
    let facts = animal_facts(&repo, animal_id).await?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    authorize_animal_access(&access, &facts, Operation::Read).require("animal")?;

    let animal = repo
        .find_by_id(animal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
    Ok(Json(animal.into()))
}

/// Update an animal.
///
/// PATCH /api/v1/animals/:animal_id
pub async fn update_animal(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(animal_id): Path<Uuid>,
    Json(request): Json<UpdateAnimalRequest>,
) -> Result<Json<Animal>, ApiError> {
    request.validate()?;

    let repo = AnimalRepository::new(state.pool.clone());
    let facts = animal_facts(&repo, animal_id).await?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    authorize_animal_access(&access, &facts, Operation::Update).require("animal")?;

    let master = MasterDataRepository::new(state.pool.clone());
    require_master_data(&master, request.species_id, "species").await?;
    require_master_data(&master, request.breed_id, "breed").await?;

    // Explicit nulls clear a reference; only set values need authorizing.
    if let Some(Some(lot_id)) = request.current_lot_id {
        check_lot_assignment(&state, &access, lot_id).await?;
    }

    check_parent_references(
        &state,
        user_auth.user_id,
        animal_id,
        request.mother_animal_id.flatten(),
        request.father_animal_id.flatten(),
    )
    .await?;

    let animal = repo
        .update(
            animal_id,
            request.name.as_deref(),
            request.species_id,
            request.breed_id,
            request.date_of_birth,
            request.current_status.map(Into::into),
            request.mother_animal_id,
            request.father_animal_id,
            request.description.as_deref(),
            request.current_lot_id,
        )
        .await?;

    info!(animal_id = %animal_id, user_id = %user_auth.user_id, "Animal updated");

    Ok(Json(animal.into()))
}

/// Delete an animal. Strict ownership; shared farm access never suffices.
///
/// DELETE /api/v1/animals/:animal_id
pub async fn delete_animal(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(animal_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = AnimalRepository::new(state.pool.clone());
    let facts = animal_facts(&repo, animal_id).await?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    authorize_animal_access(&access, &facts, Operation::Delete).require("animal")?;

    repo.delete(animal_id).await?;

    info!(animal_id = %animal_id, user_id = %user_auth.user_id, "Animal deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List an animal's location history.
///
/// GET /api/v1/animals/:animal_id/locations
pub async fn list_locations(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(animal_id): Path<Uuid>,
) -> Result<Json<Vec<LocationHistoryEntry>>, ApiError> {
    let repo = AnimalRepository::new(state.pool.clone());
    let facts = animal_facts(&repo, animal_id).await?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    authorize_animal_access(&access, &facts, Operation::Read).require("animal")?;

    let history = repo
        .list_location_history(animal_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(history))
}

/// Record a location history entry, closing the open row it supersedes.
///
/// POST /api/v1/animals/:animal_id/locations
pub async fn record_location(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(animal_id): Path<Uuid>,
    Json(request): Json<RecordLocationRequest>,
) -> Result<(StatusCode, Json<LocationHistoryEntry>), ApiError> {
    let repo = AnimalRepository::new(state.pool.clone());
    let facts = animal_facts(&repo, animal_id).await?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    authorize_animal_access(&access, &facts, Operation::Update).require("animal")?;

    if !access.contains(request.farm_id) {
        return Err(ApiError::Forbidden("No access to this farm".to_string()));
    }

    let existing: Vec<LocationRow> = repo
        .list_location_history(animal_id)
        .await?
        .iter()
        .map(|row| LocationRow {
            farm_id: row.farm_id,
            entry_date: row.entry_date,
            exit_date: row.exit_date,
        })
        .collect();
    let superseded = repo.find_open_location(animal_id).await?.map(|row| LocationRow {
        farm_id: row.farm_id,
        entry_date: row.entry_date,
        exit_date: row.exit_date,
    });

    validate_location_history(&existing, request.farm_id, request.entry_date, superseded.as_ref())
        .map_err(DomainError::from)?;

    let entry = repo
        .record_location_entry(
            animal_id,
            request.farm_id,
            request.entry_date,
            request.reason.as_deref(),
            request.notes.as_deref(),
        )
        .await?;

    info!(
        animal_id = %animal_id,
        farm_id = %request.farm_id,
        entry_date = %request.entry_date,
        user_id = %user_auth.user_id,
        "Location entry recorded"
    );

    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_to_api_maps_not_found() {
        match deny_to_api(DenyReason::NotFound, "lot") {
            ApiError::NotFound(msg) => assert_eq!(msg, "lot not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_deny_to_api_maps_forbidden() {
        match deny_to_api(DenyReason::Forbidden, "farm") {
            ApiError::Forbidden(msg) => assert_eq!(msg, "No access to this farm"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_record_location_request_deserializes() {
        let request: RecordLocationRequest = serde_json::from_str(
            r#"{"farm_id": "7a1e3c66-58a7-4f3a-9d3c-0d4b3b1a9f00", "entry_date": "2026-04-01"}"#,
        )
        .unwrap();
        assert_eq!(
            request.entry_date,
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
        );
        assert!(request.reason.is_none());
    }
}
