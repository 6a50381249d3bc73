//! Lot routes.
//!
//! Lots are reached through their farm: every operation requires the farm in
//! the caller's accessible set, so shared users manage lots too.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::lot::{CreateLotRequest, UpdateLotRequest};
use domain::models::Lot;
use persistence::repositories::LotRepository;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Query parameters for listing lots.
#[derive(Debug, Deserialize)]
pub struct ListLotsQuery {
    pub farm_id: Uuid,
}

/// Fetch a lot and require its farm in the caller's accessible set.
async fn find_accessible_lot(
    state: &AppState,
    lot_id: Uuid,
    user_id: Uuid,
) -> Result<persistence::entities::LotEntity, ApiError> {
    let repo = LotRepository::new(state.pool.clone());
    let lot = repo
        .find_by_id(lot_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lot not found".to_string()))?;

    let access = super::resolve_farm_access(&state.pool, user_id).await?;
    if !access.contains(lot.farm_id) {
        return Err(ApiError::Forbidden("No access to this farm".to_string()));
    }
    Ok(lot)
}

/// Create a lot on a farm the caller can access.
///
/// POST /api/v1/lots
pub async fn create_lot(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateLotRequest>,
) -> Result<(StatusCode, Json<Lot>), ApiError> {
    request.validate()?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    if !access.contains(request.farm_id) {
        return Err(ApiError::Forbidden("No access to this farm".to_string()));
    }

    let repo = LotRepository::new(state.pool.clone());
    let lot = repo
        .create(request.farm_id, &request.name, request.description.as_deref())
        .await?;

    info!(lot_id = %lot.id, farm_id = %request.farm_id, user_id = %user_auth.user_id, "Lot created");

    Ok((StatusCode::CREATED, Json(lot.into())))
}

/// List the lots of an accessible farm.
///
/// GET /api/v1/lots?farm_id=...
pub async fn list_lots(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Query(query): Query<ListLotsQuery>,
) -> Result<Json<Vec<Lot>>, ApiError> {
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    if !access.contains(query.farm_id) {
        return Err(ApiError::Forbidden("No access to this farm".to_string()));
    }

    let repo = LotRepository::new(state.pool.clone());
    let lots = repo
        .list_by_farm(query.farm_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(lots))
}

/// Get one lot.
///
/// GET /api/v1/lots/:lot_id
pub async fn get_lot(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(lot_id): Path<Uuid>,
) -> Result<Json<Lot>, ApiError> {
    let lot = find_accessible_lot(&state, lot_id, user_auth.user_id).await?;
    Ok(Json(lot.into()))
}

/// Update a lot.
///
/// PATCH /api/v1/lots/:lot_id
pub async fn update_lot(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(lot_id): Path<Uuid>,
    Json(request): Json<UpdateLotRequest>,
) -> Result<Json<Lot>, ApiError> {
    request.validate()?;

    find_accessible_lot(&state, lot_id, user_auth.user_id).await?;

    let repo = LotRepository::new(state.pool.clone());
    let lot = repo
        .update(lot_id, request.name.as_deref(), request.description.as_deref())
        .await?;

    info!(lot_id = %lot_id, user_id = %user_auth.user_id, "Lot updated");

    Ok(Json(lot.into()))
}

/// Delete a lot.
///
/// DELETE /api/v1/lots/:lot_id
pub async fn delete_lot(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(lot_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    find_accessible_lot(&state, lot_id, user_auth.user_id).await?;

    let repo = LotRepository::new(state.pool.clone());
    repo.delete(lot_id).await?;

    info!(lot_id = %lot_id, user_id = %user_auth.user_id, "Lot deleted");

    Ok(StatusCode::NO_CONTENT)
}
