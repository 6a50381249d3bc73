//! Authentication routes: registration, login and token refresh.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use persistence::repositories::UserRepository;
use serde::Deserialize;
use shared::jwt::extract_user_id;
use shared::password::{hash_password, verify_password};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Request payload for refreshing a token pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Register a new user.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());

    if repo.email_exists(&request.email).await? {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&request.password)?;

    let user = repo
        .create(
            &request.email,
            &password_hash,
            request.first_name.as_deref(),
            request.last_name.as_deref(),
            request.phone_number.as_deref(),
        )
        .await?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(domain::models::User::from(user).into()),
    ))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());

    // A missing user and a wrong password produce the same error.
    let user = repo
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let jwt = UserAuth::create_jwt_config(&state.config.jwt)
        .map_err(ApiError::Internal)?;

    let access_token = jwt.generate_access_token(user.id)?;
    let refresh_token = jwt.generate_refresh_token(user.id)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
    }))
}

/// Exchange a refresh token for a fresh token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let jwt = UserAuth::create_jwt_config(&state.config.jwt)
        .map_err(ApiError::Internal)?;

    let claims = jwt.validate_refresh_token(&request.refresh_token)?;
    let user_id = extract_user_id(&claims)?;

    // The user must still exist; tokens outlive account deletion.
    let repo = UserRepository::new(state.pool.clone());
    repo.find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    let access_token = jwt.generate_access_token(user_id)?;
    let refresh_token = jwt.generate_refresh_token(user_id)?;

    info!(user_id = %user_id, "Token pair refreshed");

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_request_deserializes() {
        let request: RefreshTokenRequest =
            serde_json::from_str(r#"{"refresh_token": "abc"}"#).unwrap();
        assert_eq!(request.refresh_token, "abc");
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let request = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "short".to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_rejects_bad_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "whatever".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
