//! Health event routes.
//!
//! Creation requires every affected animal readable by the caller. Access to
//! an existing event goes to its administrator or to anyone who can read at
//! least one affected animal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::health_event::{CreateHealthEventRequest, UpdateHealthEventRequest};
use domain::models::HealthEvent;
use domain::services::{
    authorize_animal_access, authorize_health_event_access, AnimalFacts, FarmAccess,
    HealthEventFacts, Operation,
};
use persistence::repositories::{AnimalRepository, HealthEventRepository, MasterDataRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Load the event's facts: its administrator plus the facts of every
/// affected animal.
async fn event_facts(
    state: &AppState,
    event: &persistence::entities::HealthEventEntity,
    animal_ids: &[Uuid],
) -> Result<HealthEventFacts, ApiError> {
    let animals = AnimalRepository::new(state.pool.clone());
    let affected_animals: Vec<AnimalFacts> = animals
        .find_facts_for_set(animal_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(HealthEventFacts {
        administered_by_user_id: event.administered_by_user_id,
        affected_animals,
    })
}

/// Fetch an event, its animal set, and the caller's decision for `op`.
async fn find_authorized_event(
    state: &AppState,
    event_id: Uuid,
    access: &FarmAccess,
    op: Operation,
) -> Result<(persistence::entities::HealthEventEntity, Vec<Uuid>), ApiError> {
    let repo = HealthEventRepository::new(state.pool.clone());
    let event = repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Health event not found".to_string()))?;
    let animal_ids = repo.list_affected_animal_ids(event_id).await?;

    let facts = event_facts(state, &event, &animal_ids).await?;
    authorize_health_event_access(access, &facts, op).require("health event")?;

    Ok((event, animal_ids))
}

/// Create a health event. Every affected animal must be readable.
///
/// POST /api/v1/health-events
pub async fn create_health_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateHealthEventRequest>,
) -> Result<(StatusCode, Json<HealthEvent>), ApiError> {
    request.validate()?;

    if let Some(product_id) = request.product_id {
        let master = MasterDataRepository::new(state.pool.clone());
        if !master.exists_in_category(product_id, "product").await? {
            return Err(ApiError::NotFound("product not found".to_string()));
        }
    }

    let animals = AnimalRepository::new(state.pool.clone());
    let facts = animals.find_facts_for_set(&request.animal_ids).await?;
    if facts.len() != request.animal_ids.len() {
        return Err(ApiError::NotFound("Animal not found".to_string()));
    }

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    for animal in &facts {
        authorize_animal_access(&access, &animal.clone().into(), Operation::Read)
            .require("animal")?;
    }

    let repo = HealthEventRepository::new(state.pool.clone());
    let event = repo
        .create(
            request.event_type.into(),
            request.event_date,
            request.product_id,
            request.dosage.as_deref(),
            user_auth.user_id,
            request.diagnosis.as_deref(),
            request.notes.as_deref(),
            &request.animal_ids,
        )
        .await?;

    info!(
        event_id = %event.id,
        event_type = %request.event_type,
        animal_count = request.animal_ids.len(),
        user_id = %user_auth.user_id,
        "Health event created"
    );

    let animal_ids = request.animal_ids;
    Ok((StatusCode::CREATED, Json(event.into_model(animal_ids))))
}

/// List health events visible to the caller.
///
/// GET /api/v1/health-events
pub async fn list_health_events(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
) -> Result<Json<Vec<HealthEvent>>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let farm_ids: Vec<Uuid> = access.farm_ids().iter().copied().collect();

    let repo = HealthEventRepository::new(state.pool.clone());
    let events = repo.list_visible(user_auth.user_id, &farm_ids).await?;

    let mut models = Vec::with_capacity(events.len());
    for event in events {
        let animal_ids = repo.list_affected_animal_ids(event.id).await?;
        models.push(event.into_model(animal_ids));
    }
    Ok(Json(models))
}

/// Get one health event.
///
/// GET /api/v1/health-events/:event_id
pub async fn get_health_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<HealthEvent>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let (event, animal_ids) =
        find_authorized_event(&state, event_id, &access, Operation::Read).await?;
    Ok(Json(event.into_model(animal_ids)))
}

/// Update a health event. The affected-animal set is fixed at creation.
///
/// PATCH /api/v1/health-events/:event_id
pub async fn update_health_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateHealthEventRequest>,
) -> Result<Json<HealthEvent>, ApiError> {
    request.validate()?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let (_, animal_ids) =
        find_authorized_event(&state, event_id, &access, Operation::Update).await?;

    if let Some(product_id) = request.product_id {
        let master = MasterDataRepository::new(state.pool.clone());
        if !master.exists_in_category(product_id, "product").await? {
            return Err(ApiError::NotFound("product not found".to_string()));
        }
    }

    let repo = HealthEventRepository::new(state.pool.clone());
    let event = repo
        .update(
            event_id,
            request.event_type.map(Into::into),
            request.event_date,
            request.product_id,
            request.dosage.as_deref(),
            request.diagnosis.as_deref(),
            request.notes.as_deref(),
        )
        .await?;

    info!(event_id = %event_id, user_id = %user_auth.user_id, "Health event updated");

    Ok(Json(event.into_model(animal_ids)))
}

/// Delete a health event and its animal pivot rows.
///
/// DELETE /api/v1/health-events/:event_id
pub async fn delete_health_event(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    find_authorized_event(&state, event_id, &access, Operation::Delete).await?;

    let repo = HealthEventRepository::new(state.pool.clone());
    repo.delete(event_id).await?;

    info!(event_id = %event_id, user_id = %user_auth.user_id, "Health event deleted");

    Ok(StatusCode::NO_CONTENT)
}
