//! Master data routes.
//!
//! Reference values (species, breeds, products, feed types, supplements,
//! group purposes) shared by all users. Any authenticated user may read and
//! contribute; rows deactivate rather than delete so references stay valid.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::master_data::{CreateMasterDataRequest, UpdateMasterDataRequest};
use domain::models::MasterData;
use persistence::repositories::MasterDataRepository;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Query parameters for listing master data.
#[derive(Debug, Deserialize)]
pub struct ListMasterDataQuery {
    pub category: String,
}

/// Create a master data row.
///
/// POST /api/v1/master-data
pub async fn create_master_data(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateMasterDataRequest>,
) -> Result<(StatusCode, Json<MasterData>), ApiError> {
    request.validate()?;

    let repo = MasterDataRepository::new(state.pool.clone());
    let row = repo
        .create(
            &request.category,
            &request.name,
            request.description.as_deref(),
            request.properties.as_ref(),
            user_auth.user_id,
        )
        .await?;

    info!(
        master_data_id = %row.id,
        category = %row.category,
        user_id = %user_auth.user_id,
        "Master data created"
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// List active master data rows in a category.
///
/// GET /api/v1/master-data?category=...
pub async fn list_master_data(
    State(state): State<AppState>,
    Query(query): Query<ListMasterDataQuery>,
) -> Result<Json<Vec<MasterData>>, ApiError> {
    let repo = MasterDataRepository::new(state.pool.clone());
    let rows = repo
        .list_by_category(&query.category)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(rows))
}

/// Get one master data row.
///
/// GET /api/v1/master-data/:id
pub async fn get_master_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MasterData>, ApiError> {
    let repo = MasterDataRepository::new(state.pool.clone());
    let row = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Master data not found".to_string()))?;
    Ok(Json(row.into()))
}

/// Update a master data row. The category is fixed at creation.
///
/// PATCH /api/v1/master-data/:id
pub async fn update_master_data(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMasterDataRequest>,
) -> Result<Json<MasterData>, ApiError> {
    request.validate()?;

    let repo = MasterDataRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Master data not found".to_string()))?;
    if existing.created_by_user_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the creator may update master data".to_string(),
        ));
    }

    let row = repo
        .update(
            id,
            request.name.as_deref(),
            request.description.as_deref(),
            request.properties.as_ref(),
            request.is_active,
        )
        .await?;

    info!(master_data_id = %id, user_id = %user_auth.user_id, "Master data updated");

    Ok(Json(row.into()))
}
