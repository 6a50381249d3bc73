//! Reproductive event routes.
//!
//! An event is reachable through either parent: anyone who can read the dam
//! or the sire can read and modify it. Offspring links are a subresource and
//! require the linked animal to be readable as well.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::reproductive_event::{
    CreateReproductiveEventRequest, RecordOffspringRequest, UpdateReproductiveEventRequest,
};
use domain::models::ReproductiveEvent;
use domain::services::{
    authorize_animal_access, authorize_reproductive_event_access, FarmAccess, Operation,
    ReproductiveEventFacts,
};
use persistence::repositories::{AnimalRepository, ReproductiveEventRepository};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Query parameters for listing reproductive events.
#[derive(Debug, Deserialize)]
pub struct ListReproductiveEventsQuery {
    /// Narrow the listing to one dam.
    pub animal_id: Option<Uuid>,
}

/// Load the dam's and sire's facts for an event.
async fn event_facts(
    state: &AppState,
    dam_id: Uuid,
    sire_id: Option<Uuid>,
) -> Result<ReproductiveEventFacts, ApiError> {
    let animals = AnimalRepository::new(state.pool.clone());
    let dam = animals
        .find_facts(dam_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?
        .into();
    let sire = match sire_id {
        Some(id) => animals.find_facts(id).await?.map(Into::into),
        None => None,
    };
    Ok(ReproductiveEventFacts { dam, sire })
}

/// Fetch an event and the caller's decision for `op`.
async fn find_authorized_event(
    state: &AppState,
    event_id: Uuid,
    access: &FarmAccess,
    op: Operation,
) -> Result<persistence::entities::ReproductiveEventEntity, ApiError> {
    let repo = ReproductiveEventRepository::new(state.pool.clone());
    let event = repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reproductive event not found".to_string()))?;

    let facts = event_facts(state, event.animal_id, event.sire_animal_id).await?;
    authorize_reproductive_event_access(access, &facts, op).require("reproductive event")?;

    Ok(event)
}

/// Create a reproductive event. The dam, and the sire when given, must be
/// readable.
///
/// POST /api/v1/reproductive-events
pub async fn create_reproductive_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateReproductiveEventRequest>,
) -> Result<(StatusCode, Json<ReproductiveEvent>), ApiError> {
    request.validate()?;

    let animals = AnimalRepository::new(state.pool.clone());
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;

    let dam = animals
        .find_facts(request.animal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
    authorize_animal_access(&access, &dam.into(), Operation::Read).require("animal")?;

    if let Some(sire_id) = request.sire_animal_id {
        let sire = animals
            .find_facts(sire_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
        authorize_animal_access(&access, &sire.into(), Operation::Read).require("animal")?;
    }

    let repo = ReproductiveEventRepository::new(state.pool.clone());
    let event = repo
        .create(
            request.animal_id,
            request.event_type.into(),
            request.event_date,
            request.sire_animal_id,
            request.gestation_diagnosis_result.map(Into::into),
            request.expected_delivery_date,
            request.actual_delivery_date,
            request.number_of_offspring,
            request.notes.as_deref(),
        )
        .await?;

    info!(
        event_id = %event.id,
        event_type = %request.event_type,
        animal_id = %request.animal_id,
        user_id = %user_auth.user_id,
        "Reproductive event created"
    );

    Ok((StatusCode::CREATED, Json(event.into_model(Vec::new()))))
}

/// List reproductive events visible to the caller.
///
/// GET /api/v1/reproductive-events?animal_id=...
pub async fn list_reproductive_events(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Query(query): Query<ListReproductiveEventsQuery>,
) -> Result<Json<Vec<ReproductiveEvent>>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let farm_ids: Vec<Uuid> = access.farm_ids().iter().copied().collect();

    let repo = ReproductiveEventRepository::new(state.pool.clone());
    let events = repo
        .list_visible(user_auth.user_id, &farm_ids, query.animal_id)
        .await?;

    let mut models = Vec::with_capacity(events.len());
    for event in events {
        let offspring = repo.list_offspring_ids(event.id).await?;
        models.push(event.into_model(offspring));
    }
    Ok(Json(models))
}

/// Get one reproductive event.
///
/// GET /api/v1/reproductive-events/:event_id
pub async fn get_reproductive_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ReproductiveEvent>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let event = find_authorized_event(&state, event_id, &access, Operation::Read).await?;

    let repo = ReproductiveEventRepository::new(state.pool.clone());
    let offspring = repo.list_offspring_ids(event_id).await?;
    Ok(Json(event.into_model(offspring)))
}

/// Update a reproductive event. The dam and sire are fixed at creation.
///
/// PATCH /api/v1/reproductive-events/:event_id
pub async fn update_reproductive_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateReproductiveEventRequest>,
) -> Result<Json<ReproductiveEvent>, ApiError> {
    request.validate()?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    find_authorized_event(&state, event_id, &access, Operation::Update).await?;

    let repo = ReproductiveEventRepository::new(state.pool.clone());
    let event = repo
        .update(
            event_id,
            request.event_type.map(Into::into),
            request.event_date,
            request.gestation_diagnosis_result.map(Into::into),
            request.expected_delivery_date,
            request.actual_delivery_date,
            request.number_of_offspring,
            request.notes.as_deref(),
        )
        .await?;

    info!(event_id = %event_id, user_id = %user_auth.user_id, "Reproductive event updated");

    let offspring = repo.list_offspring_ids(event_id).await?;
    Ok(Json(event.into_model(offspring)))
}

/// Delete a reproductive event and its offspring links.
///
/// DELETE /api/v1/reproductive-events/:event_id
pub async fn delete_reproductive_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    find_authorized_event(&state, event_id, &access, Operation::Delete).await?;

    let repo = ReproductiveEventRepository::new(state.pool.clone());
    repo.delete(event_id).await?;

    info!(event_id = %event_id, user_id = %user_auth.user_id, "Reproductive event deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Link an offspring animal to an event. The animal must exist and be
/// readable; re-linking the same animal conflicts.
///
/// POST /api/v1/reproductive-events/:event_id/offspring
pub async fn add_offspring(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<RecordOffspringRequest>,
) -> Result<(StatusCode, Json<ReproductiveEvent>), ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let event = find_authorized_event(&state, event_id, &access, Operation::Update).await?;

    let animals = AnimalRepository::new(state.pool.clone());
    let offspring = animals
        .find_facts(request.offspring_animal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
    authorize_animal_access(&access, &offspring.into(), Operation::Read).require("animal")?;

    let repo = ReproductiveEventRepository::new(state.pool.clone());
    repo.add_offspring(event_id, request.offspring_animal_id)
        .await?;

    info!(
        event_id = %event_id,
        offspring_animal_id = %request.offspring_animal_id,
        user_id = %user_auth.user_id,
        "Offspring linked"
    );

    let offspring_ids = repo.list_offspring_ids(event_id).await?;
    Ok((StatusCode::CREATED, Json(event.into_model(offspring_ids))))
}

/// Unlink an offspring animal from an event.
///
/// DELETE /api/v1/reproductive-events/:event_id/offspring/:animal_id
pub async fn remove_offspring(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path((event_id, animal_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    find_authorized_event(&state, event_id, &access, Operation::Update).await?;

    let repo = ReproductiveEventRepository::new(state.pool.clone());
    let removed = repo.remove_offspring(event_id, animal_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Offspring record not found".to_string()));
    }

    info!(
        event_id = %event_id,
        offspring_animal_id = %animal_id,
        user_id = %user_auth.user_id,
        "Offspring unlinked"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::reproductive_event::ReproductiveEventType;

    #[test]
    fn test_record_offspring_request_deserializes() {
        let request: RecordOffspringRequest = serde_json::from_str(
            r#"{"offspring_animal_id": "7a1e3c66-58a7-4f3a-9d3c-0d4b3b1a9f00"}"#,
        )
        .unwrap();
        assert_eq!(
            request.offspring_animal_id.to_string(),
            "7a1e3c66-58a7-4f3a-9d3c-0d4b3b1a9f00"
        );
    }

    #[test]
    fn test_create_request_accepts_minimal_payload() {
        let request: CreateReproductiveEventRequest = serde_json::from_str(
            r#"{
                "animal_id": "7a1e3c66-58a7-4f3a-9d3c-0d4b3b1a9f00",
                "event_type": "mating",
                "event_date": "2026-05-10"
            }"#,
        )
        .unwrap();
        assert_eq!(request.event_type, ReproductiveEventType::Mating);
        assert!(request.sire_animal_id.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_negative_offspring_count() {
        let request: CreateReproductiveEventRequest = serde_json::from_str(
            r#"{
                "animal_id": "7a1e3c66-58a7-4f3a-9d3c-0d4b3b1a9f00",
                "event_type": "birth",
                "event_date": "2026-05-10",
                "number_of_offspring": -1
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
