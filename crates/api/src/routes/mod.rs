//! Route handlers per entity.

pub mod animals;
pub mod auth;
pub mod farms;
pub mod feedings;
pub mod grupos;
pub mod health;
pub mod health_events;
pub mod lots;
pub mod master_data;
pub mod reproductive_events;
pub mod transactions;
pub mod users;
pub mod weighings;

use chrono::Utc;
use domain::services::{FarmAccess, GrantFact};
use persistence::repositories::FarmRepository;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Resolve the caller's accessible farm set for this request.
///
/// The set is computed fresh on every call; grants expire, so it must never
/// be cached across requests.
pub(crate) async fn resolve_farm_access(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<FarmAccess, ApiError> {
    let repo = FarmRepository::new(pool.clone());
    let owned = repo.list_owned_farm_ids(user_id).await?;
    let grants: Vec<GrantFact> = repo
        .list_grant_facts(user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(FarmAccess::resolve(user_id, &owned, &grants, Utc::now()))
}
