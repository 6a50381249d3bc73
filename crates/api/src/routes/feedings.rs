//! Feeding routes.
//!
//! Feedings are administrator-scoped for every operation, narrower than the
//! health event rule. Creation still requires every covered animal readable.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::feeding::{CreateFeedingRequest, UpdateFeedingRequest};
use domain::models::Feeding;
use domain::services::{
    authorize_animal_access, authorize_feeding_access, FeedingFacts, Operation,
};
use persistence::repositories::{AnimalRepository, FeedingRepository, MasterDataRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Fetch a feeding and require the administrator rule for `op`.
async fn find_authorized_feeding(
    repo: &FeedingRepository,
    feeding_id: Uuid,
    user_id: Uuid,
    op: Operation,
) -> Result<persistence::entities::FeedingEntity, ApiError> {
    let feeding = repo
        .find_by_id(feeding_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feeding not found".to_string()))?;
    let facts = FeedingFacts {
        administered_by_user_id: feeding.administered_by_user_id,
    };
    authorize_feeding_access(user_id, &facts, op).require("feeding")?;
    Ok(feeding)
}

/// Create a feeding. Every covered animal must be readable.
///
/// POST /api/v1/feedings
pub async fn create_feeding(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateFeedingRequest>,
) -> Result<(StatusCode, Json<Feeding>), ApiError> {
    request.validate()?;

    let master = MasterDataRepository::new(state.pool.clone());
    if !master
        .exists_in_category(request.feed_type_id, "feed_type")
        .await?
    {
        return Err(ApiError::NotFound("feed_type not found".to_string()));
    }
    if let Some(supplement_id) = request.supplement_id {
        if !master.exists_in_category(supplement_id, "supplement").await? {
            return Err(ApiError::NotFound("supplement not found".to_string()));
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

    let repo = FeedingRepository::new(state.pool.clone());
    let feeding = repo
        .create(
            request.feeding_date,
            request.feed_type_id,
            request.quantity_kg,
            request.supplement_id,
            user_auth.user_id,
            request.notes.as_deref(),
            &request.animal_ids,
        )
        .await?;

    info!(
        feeding_id = %feeding.id,
        animal_count = request.animal_ids.len(),
        quantity_kg = request.quantity_kg,
        user_id = %user_auth.user_id,
        "Feeding created"
    );

    let animal_ids = request.animal_ids;
    Ok((StatusCode::CREATED, Json(feeding.into_model(animal_ids))))
}

/// List feedings administered by the caller.
///
/// GET /api/v1/feedings
pub async fn list_feedings(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
) -> Result<Json<Vec<Feeding>>, ApiError> {
    let repo = FeedingRepository::new(state.pool.clone());
    let feedings = repo.list_by_administrator(user_auth.user_id).await?;

    let mut models = Vec::with_capacity(feedings.len());
    for feeding in feedings {
        let animal_ids = repo.list_affected_animal_ids(feeding.id).await?;
        models.push(feeding.into_model(animal_ids));
    }
    Ok(Json(models))
}

/// Get one feeding. Administrator only.
///
/// GET /api/v1/feedings/:feeding_id
pub async fn get_feeding(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(feeding_id): Path<Uuid>,
) -> Result<Json<Feeding>, ApiError> {
    let repo = FeedingRepository::new(state.pool.clone());
    let feeding =
        find_authorized_feeding(&repo, feeding_id, user_auth.user_id, Operation::Read).await?;
    let animal_ids = repo.list_affected_animal_ids(feeding_id).await?;
    Ok(Json(feeding.into_model(animal_ids)))
}

/// Update a feeding. The covered-animal set is fixed at creation.
///
/// PATCH /api/v1/feedings/:feeding_id
pub async fn update_feeding(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(feeding_id): Path<Uuid>,
    Json(request): Json<UpdateFeedingRequest>,
) -> Result<Json<Feeding>, ApiError> {
    request.validate()?;

    let repo = FeedingRepository::new(state.pool.clone());
    find_authorized_feeding(&repo, feeding_id, user_auth.user_id, Operation::Update).await?;

    let master = MasterDataRepository::new(state.pool.clone());
    if let Some(feed_type_id) = request.feed_type_id {
        if !master.exists_in_category(feed_type_id, "feed_type").await? {
            return Err(ApiError::NotFound("feed_type not found".to_string()));
        }
    }
    if let Some(supplement_id) = request.supplement_id {
        if !master.exists_in_category(supplement_id, "supplement").await? {
            return Err(ApiError::NotFound("supplement not found".to_string()));
        }
    }

    let feeding = repo
        .update(
            feeding_id,
            request.feeding_date,
            request.feed_type_id,
            request.quantity_kg,
            request.supplement_id,
            request.notes.as_deref(),
        )
        .await?;

    info!(feeding_id = %feeding_id, user_id = %user_auth.user_id, "Feeding updated");

    let animal_ids = repo.list_affected_animal_ids(feeding_id).await?;
    Ok(Json(feeding.into_model(animal_ids)))
}

/// Delete a feeding and its animal pivot rows.
///
/// DELETE /api/v1/feedings/:feeding_id
pub async fn delete_feeding(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(feeding_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = FeedingRepository::new(state.pool.clone());
    find_authorized_feeding(&repo, feeding_id, user_auth.user_id, Operation::Delete).await?;

    repo.delete(feeding_id).await?;

    info!(feeding_id = %feeding_id, user_id = %user_auth.user_id, "Feeding deleted");

    Ok(StatusCode::NO_CONTENT)
}
