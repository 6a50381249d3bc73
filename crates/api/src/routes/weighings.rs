//! Weighing routes.
//!
//! A weighing follows its animal's readability: anyone who can read the
//! animal can record, amend, and delete its weighings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::weighing::{CreateWeighingRequest, UpdateWeighingRequest};
use domain::models::Weighing;
use domain::services::{authorize_weighing_access, AnimalFacts, FarmAccess, Operation};
use persistence::repositories::{AnimalRepository, WeighingRepository};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Query parameters for listing weighings.
#[derive(Debug, Deserialize)]
pub struct ListWeighingsQuery {
    /// Narrow the listing to one animal.
    pub animal_id: Option<Uuid>,
}

/// Fetch the weighed animal's facts, failing with 404 when it does not exist.
async fn weighed_animal_facts(state: &AppState, animal_id: Uuid) -> Result<AnimalFacts, ApiError> {
    let animals = AnimalRepository::new(state.pool.clone());
    let facts = animals
        .find_facts(animal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
    Ok(facts.into())
}

/// Fetch a weighing and the caller's decision for `op`.
async fn find_authorized_weighing(
    state: &AppState,
    weighing_id: Uuid,
    access: &FarmAccess,
    op: Operation,
) -> Result<persistence::entities::WeighingEntity, ApiError> {
    let repo = WeighingRepository::new(state.pool.clone());
    let weighing = repo
        .find_by_id(weighing_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Weighing not found".to_string()))?;

    let facts = weighed_animal_facts(state, weighing.animal_id).await?;
    authorize_weighing_access(access, &facts, op).require("weighing")?;

    Ok(weighing)
}

/// Record a weighing. The animal must be readable.
///
/// POST /api/v1/weighings
pub async fn create_weighing(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateWeighingRequest>,
) -> Result<(StatusCode, Json<Weighing>), ApiError> {
    request.validate()?;

    let facts = weighed_animal_facts(&state, request.animal_id).await?;
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    authorize_weighing_access(&access, &facts, Operation::Read).require("animal")?;

    let repo = WeighingRepository::new(state.pool.clone());
    let weighing = repo
        .create(
            request.animal_id,
            request.weighing_date,
            request.weight_kg,
            request.notes.as_deref(),
        )
        .await?;

    info!(
        weighing_id = %weighing.id,
        animal_id = %request.animal_id,
        user_id = %user_auth.user_id,
        "Weighing recorded"
    );

    Ok((StatusCode::CREATED, Json(weighing.into())))
}

/// List weighings visible to the caller.
///
/// GET /api/v1/weighings?animal_id=...
pub async fn list_weighings(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Query(query): Query<ListWeighingsQuery>,
) -> Result<Json<Vec<Weighing>>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let farm_ids: Vec<Uuid> = access.farm_ids().iter().copied().collect();

    let repo = WeighingRepository::new(state.pool.clone());
    let weighings = repo
        .list_visible(user_auth.user_id, &farm_ids, query.animal_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(weighings))
}

/// Get one weighing.
///
/// GET /api/v1/weighings/:weighing_id
pub async fn get_weighing(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(weighing_id): Path<Uuid>,
) -> Result<Json<Weighing>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    let weighing = find_authorized_weighing(&state, weighing_id, &access, Operation::Read).await?;
    Ok(Json(weighing.into()))
}

/// Update a weighing. The animal is fixed at creation.
///
/// PATCH /api/v1/weighings/:weighing_id
pub async fn update_weighing(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(weighing_id): Path<Uuid>,
    Json(request): Json<UpdateWeighingRequest>,
) -> Result<Json<Weighing>, ApiError> {
    request.validate()?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    find_authorized_weighing(&state, weighing_id, &access, Operation::Update).await?;

    let repo = WeighingRepository::new(state.pool.clone());
    let weighing = repo
        .update(
            weighing_id,
            request.weighing_date,
            request.weight_kg,
            request.notes.as_deref(),
        )
        .await?;

    info!(weighing_id = %weighing_id, user_id = %user_auth.user_id, "Weighing updated");

    Ok(Json(weighing.into()))
}

/// Delete a weighing.
///
/// DELETE /api/v1/weighings/:weighing_id
pub async fn delete_weighing(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(weighing_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    find_authorized_weighing(&state, weighing_id, &access, Operation::Delete).await?;

    let repo = WeighingRepository::new(state.pool.clone());
    repo.delete(weighing_id).await?;

    info!(weighing_id = %weighing_id, user_id = %user_auth.user_id, "Weighing deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_create_request_deserializes() {
        let request: CreateWeighingRequest = serde_json::from_str(
            r#"{
                "animal_id": "7a1e3c66-58a7-4f3a-9d3c-0d4b3b1a9f00",
                "weighing_date": "2026-06-15",
                "weight_kg": 385.0
            }"#,
        )
        .unwrap();
        assert_eq!(
            request.weighing_date,
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
        );
        assert!(request.notes.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_nonpositive_weight() {
        let request: UpdateWeighingRequest =
            serde_json::from_str(r#"{"weight_kg": -10.0}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
