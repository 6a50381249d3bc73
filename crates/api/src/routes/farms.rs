//! Farm routes, including sharing grant management.
//!
//! Farms are readable by anyone in the accessible set; mutation and grant
//! management are owner-only. Ownership itself is immutable.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use domain::models::farm::{CreateFarmRequest, GrantFarmAccessRequest, UpdateFarmRequest};
use domain::models::{Farm, FarmAccessGrant};
use persistence::repositories::FarmRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Fetch a farm and require that the caller owns it.
async fn find_owned_farm(
    repo: &FarmRepository,
    farm_id: Uuid,
    user_id: Uuid,
) -> Result<persistence::entities::FarmEntity, ApiError> {
    let farm = repo
        .find_by_id(farm_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Farm not found".to_string()))?;
    if farm.owner_user_id != user_id {
        return Err(ApiError::Forbidden("Not the farm owner".to_string()));
    }
    Ok(farm)
}

/// Create a farm owned by the caller.
///
/// POST /api/v1/farms
pub async fn create_farm(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateFarmRequest>,
) -> Result<(StatusCode, Json<Farm>), ApiError> {
    request.validate()?;

    let repo = FarmRepository::new(state.pool.clone());
    let farm = repo
        .create(
            &request.name,
            request.location.as_deref(),
            request.latitude,
            request.longitude,
            request.area_hectares,
            user_auth.user_id,
            request.contact_info.as_deref(),
        )
        .await?;

    info!(farm_id = %farm.id, user_id = %user_auth.user_id, "Farm created");

    Ok((StatusCode::CREATED, Json(farm.into())))
}

/// List farms the caller owns or holds an active grant on.
///
/// GET /api/v1/farms
pub async fn list_farms(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
) -> Result<Json<Vec<Farm>>, ApiError> {
    let repo = FarmRepository::new(state.pool.clone());
    let farms = repo
        .list_accessible(user_auth.user_id, Utc::now())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(farms))
}

/// Get one farm. The caller must own it or hold an active grant.
///
/// GET /api/v1/farms/:farm_id
pub async fn get_farm(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(farm_id): Path<Uuid>,
) -> Result<Json<Farm>, ApiError> {
    let repo = FarmRepository::new(state.pool.clone());
    let farm = repo
        .find_by_id(farm_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Farm not found".to_string()))?;

    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    if !access.contains(farm_id) {
        return Err(ApiError::Forbidden("No access to this farm".to_string()));
    }

    Ok(Json(farm.into()))
}

/// Update a farm. Owner-only; shared access never authorizes mutation.
///
/// PATCH /api/v1/farms/:farm_id
pub async fn update_farm(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(farm_id): Path<Uuid>,
    Json(request): Json<UpdateFarmRequest>,
) -> Result<Json<Farm>, ApiError> {
    request.validate()?;

    let repo = FarmRepository::new(state.pool.clone());
    find_owned_farm(&repo, farm_id, user_auth.user_id).await?;

    let farm = repo
        .update(
            farm_id,
            request.name.as_deref(),
            request.location.as_deref(),
            request.latitude,
            request.longitude,
            request.area_hectares,
            request.contact_info.as_deref(),
        )
        .await?;

    info!(farm_id = %farm_id, user_id = %user_auth.user_id, "Farm updated");

    Ok(Json(farm.into()))
}

/// Delete a farm. Owner-only.
///
/// DELETE /api/v1/farms/:farm_id
pub async fn delete_farm(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(farm_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = FarmRepository::new(state.pool.clone());
    find_owned_farm(&repo, farm_id, user_auth.user_id).await?;

    repo.delete(farm_id).await?;

    info!(farm_id = %farm_id, user_id = %user_auth.user_id, "Farm deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Grant shared access on a farm to another user. Owner-only.
///
/// POST /api/v1/farms/:farm_id/access
pub async fn grant_access(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(farm_id): Path<Uuid>,
    Json(request): Json<GrantFarmAccessRequest>,
) -> Result<(StatusCode, Json<FarmAccessGrant>), ApiError> {
    let repo = FarmRepository::new(state.pool.clone());
    find_owned_farm(&repo, farm_id, user_auth.user_id).await?;

    if request.user_id == user_auth.user_id {
        return Err(ApiError::Validation(
            "Cannot grant access to yourself".to_string(),
        ));
    }

    let grant = repo
        .grant_access(request.user_id, farm_id, user_auth.user_id, request.expires_at)
        .await?;

    info!(
        farm_id = %farm_id,
        grantee_id = %request.user_id,
        granted_by = %user_auth.user_id,
        expires_at = ?request.expires_at,
        "Farm access granted"
    );

    Ok((StatusCode::CREATED, Json(grant.into())))
}

/// Revoke a user's shared access on a farm. Owner-only.
///
/// DELETE /api/v1/farms/:farm_id/access/:user_id
pub async fn revoke_access(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path((farm_id, grantee_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let repo = FarmRepository::new(state.pool.clone());
    find_owned_farm(&repo, farm_id, user_auth.user_id).await?;

    let removed = repo.revoke_access(grantee_id, farm_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Grant not found".to_string()));
    }

    info!(
        farm_id = %farm_id,
        grantee_id = %grantee_id,
        revoked_by = %user_auth.user_id,
        "Farm access revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// List all grants on a farm. Owner-only.
///
/// GET /api/v1/farms/:farm_id/access
pub async fn list_grants(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(farm_id): Path<Uuid>,
) -> Result<Json<Vec<FarmAccessGrant>>, ApiError> {
    let repo = FarmRepository::new(state.pool.clone());
    find_owned_farm(&repo, farm_id, user_auth.user_id).await?;

    let grants = repo
        .list_grants_for_farm(farm_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(grants))
}
