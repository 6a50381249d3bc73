//! User profile routes.

use axum::{extract::State, Extension, Json};
use domain::models::user::UserResponse;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Get the authenticated user's profile.
///
/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(domain::models::User::from(user).into()))
}
