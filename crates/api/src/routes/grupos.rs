//! Group routes, including temporal membership management.
//!
//! Groups are creator-scoped for every operation; farm access is never
//! consulted here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::grupo::{AssignMembershipRequest, CreateGrupoRequest, UpdateGrupoRequest};
use domain::models::{GroupMembership, Grupo};
use domain::services::{
    authorize_animal_access, authorize_group_access, validate_group_membership, ActiveMembership,
    Operation,
};
use domain::DomainError;
use persistence::repositories::{AnimalRepository, GrupoRepository, MasterDataRepository};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Request payload for closing a membership.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoveMembershipRequest {
    pub removed_date: chrono::NaiveDate,
}

/// Fetch a group and require that the caller created it.
async fn find_own_grupo(
    repo: &GrupoRepository,
    grupo_id: Uuid,
    user_id: Uuid,
    op: Operation,
) -> Result<persistence::entities::GrupoEntity, ApiError> {
    let grupo = repo
        .find_by_id(grupo_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;
    authorize_group_access(user_id, grupo.created_by_user_id, op).require("group")?;
    Ok(grupo)
}

/// Create a group.
///
/// POST /api/v1/grupos
pub async fn create_grupo(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateGrupoRequest>,
) -> Result<(StatusCode, Json<Grupo>), ApiError> {
    request.validate()?;

    if let Some(purpose_id) = request.purpose_id {
        let master = MasterDataRepository::new(state.pool.clone());
        if !master.exists_in_category(purpose_id, "group_purpose").await? {
            return Err(ApiError::NotFound("group_purpose not found".to_string()));
        }
    }

    let repo = GrupoRepository::new(state.pool.clone());
    let grupo = repo
        .create(
            &request.name,
            request.description.as_deref(),
            request.purpose_id,
            user_auth.user_id,
        )
        .await?;

    info!(grupo_id = %grupo.id, user_id = %user_auth.user_id, "Group created");

    Ok((StatusCode::CREATED, Json(grupo.into())))
}

/// List groups created by the caller.
///
/// GET /api/v1/grupos
pub async fn list_grupos(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
) -> Result<Json<Vec<Grupo>>, ApiError> {
    let repo = GrupoRepository::new(state.pool.clone());
    let grupos = repo
        .list_by_creator(user_auth.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(grupos))
}

/// Get one group.
///
/// GET /api/v1/grupos/:grupo_id
pub async fn get_grupo(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(grupo_id): Path<Uuid>,
) -> Result<Json<Grupo>, ApiError> {
    let repo = GrupoRepository::new(state.pool.clone());
    let grupo = find_own_grupo(&repo, grupo_id, user_auth.user_id, Operation::Read).await?;
    Ok(Json(grupo.into()))
}

/// Update a group.
///
/// PATCH /api/v1/grupos/:grupo_id
pub async fn update_grupo(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(grupo_id): Path<Uuid>,
    Json(request): Json<UpdateGrupoRequest>,
) -> Result<Json<Grupo>, ApiError> {
    request.validate()?;

    let repo = GrupoRepository::new(state.pool.clone());
    find_own_grupo(&repo, grupo_id, user_auth.user_id, Operation::Update).await?;

    if let Some(purpose_id) = request.purpose_id {
        let master = MasterDataRepository::new(state.pool.clone());
        if !master.exists_in_category(purpose_id, "group_purpose").await? {
            return Err(ApiError::NotFound("group_purpose not found".to_string()));
        }
    }

    let grupo = repo
        .update(
            grupo_id,
            request.name.as_deref(),
            request.description.as_deref(),
            request.purpose_id,
        )
        .await?;

    info!(grupo_id = %grupo_id, user_id = %user_auth.user_id, "Group updated");

    Ok(Json(grupo.into()))
}

/// Delete a group and its membership rows.
///
/// DELETE /api/v1/grupos/:grupo_id
pub async fn delete_grupo(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(grupo_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = GrupoRepository::new(state.pool.clone());
    find_own_grupo(&repo, grupo_id, user_auth.user_id, Operation::Delete).await?;

    repo.delete(grupo_id).await?;

    info!(grupo_id = %grupo_id, user_id = %user_auth.user_id, "Group deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List a group's membership rows, active first.
///
/// GET /api/v1/grupos/:grupo_id/memberships
pub async fn list_memberships(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(grupo_id): Path<Uuid>,
) -> Result<Json<Vec<GroupMembership>>, ApiError> {
    let repo = GrupoRepository::new(state.pool.clone());
    find_own_grupo(&repo, grupo_id, user_auth.user_id, Operation::Read).await?;

    let memberships = repo
        .list_memberships(grupo_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(memberships))
}

/// Assign an animal to a group.
///
/// POST /api/v1/grupos/:grupo_id/memberships
pub async fn add_membership(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(grupo_id): Path<Uuid>,
    Json(request): Json<AssignMembershipRequest>,
) -> Result<(StatusCode, Json<GroupMembership>), ApiError> {
    let repo = GrupoRepository::new(state.pool.clone());
    find_own_grupo(&repo, grupo_id, user_auth.user_id, Operation::Update).await?;

    // The animal must be readable by the caller.
    let animals = AnimalRepository::new(state.pool.clone());
    let facts = animals
        .find_facts(request.animal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
    let access = super::resolve_farm_access(&state.pool, user_auth.user_id).await?;
    authorize_animal_access(&access, &facts.into(), Operation::Read).require("animal")?;

    let existing_active = repo
        .find_active_membership(request.animal_id, grupo_id)
        .await?
        .map(|row| ActiveMembership {
            assigned_date: row.assigned_date,
        });

    validate_group_membership(
        existing_active.as_ref(),
        request.assigned_date,
        request.removed_date,
    )
    .map_err(DomainError::from)?;

    let membership = repo
        .add_membership(
            request.animal_id,
            grupo_id,
            request.assigned_date,
            request.removed_date,
            request.notes.as_deref(),
        )
        .await?;

    info!(
        grupo_id = %grupo_id,
        animal_id = %request.animal_id,
        assigned_date = %request.assigned_date,
        user_id = %user_auth.user_id,
        "Group membership added"
    );

    Ok((StatusCode::CREATED, Json(membership.into())))
}

/// Close the active membership of an animal in a group.
///
/// DELETE /api/v1/grupos/:grupo_id/memberships/:animal_id
pub async fn remove_membership(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path((grupo_id, animal_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<RemoveMembershipRequest>,
) -> Result<StatusCode, ApiError> {
    let repo = GrupoRepository::new(state.pool.clone());
    find_own_grupo(&repo, grupo_id, user_auth.user_id, Operation::Update).await?;

    let active = repo
        .find_active_membership(animal_id, grupo_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Active membership not found".to_string()))?;

    if request.removed_date < active.assigned_date {
        return Err(DomainError::from(
            domain::RelationViolation::MembershipRemovedBeforeAssigned,
        )
        .into());
    }

    repo.remove_membership(animal_id, grupo_id, request.removed_date)
        .await?;

    info!(
        grupo_id = %grupo_id,
        animal_id = %animal_id,
        removed_date = %request.removed_date,
        user_id = %user_auth.user_id,
        "Group membership closed"
    );

    Ok(StatusCode::NO_CONTENT)
}
