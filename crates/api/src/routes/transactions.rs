//! Animal transaction routes.
//!
//! Either party may read a transaction; only the from-owner may amend or
//! delete it. Recording one requires ownership of the animal being moved.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::transaction::{CreateTransactionRequest, UpdateTransactionRequest};
use domain::models::Transaction;
use domain::services::{authorize_transaction_access, Operation, TransactionFacts};
use persistence::repositories::{AnimalRepository, TransactionRepository, UserRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Fetch a transaction and require the party rule for `op`.
async fn find_authorized_transaction(
    repo: &TransactionRepository,
    transaction_id: Uuid,
    user_id: Uuid,
    op: Operation,
) -> Result<persistence::entities::TransactionEntity, ApiError> {
    let tx = repo
        .find_by_id(transaction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;
    let facts = TransactionFacts {
        from_owner_user_id: tx.from_owner_user_id,
        to_owner_user_id: tx.to_owner_user_id,
    };
    authorize_transaction_access(user_id, &facts, op).require("transaction")?;
    Ok(tx)
}

/// Record a transaction for an animal the caller owns.
///
/// POST /api/v1/transactions
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    request.validate()?;

    let animals = AnimalRepository::new(state.pool.clone());
    let facts = animals
        .find_facts(request.animal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Animal not found".to_string()))?;
    if facts.owner_user_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the animal's owner may record a transaction".to_string(),
        ));
    }

    if let Some(to_owner) = request.to_owner_user_id {
        let users = UserRepository::new(state.pool.clone());
        users
            .find_by_id(to_owner)
            .await?
            .ok_or_else(|| ApiError::NotFound("Receiving user not found".to_string()))?;
    }

    let repo = TransactionRepository::new(state.pool.clone());
    let tx = repo
        .create(
            request.animal_id,
            request.transaction_type.into(),
            request.transaction_date,
            user_auth.user_id,
            request.to_owner_user_id,
            request.price,
            request.notes.as_deref(),
        )
        .await?;

    info!(
        transaction_id = %tx.id,
        animal_id = %request.animal_id,
        transaction_type = %request.transaction_type,
        user_id = %user_auth.user_id,
        "Transaction recorded"
    );

    Ok((StatusCode::CREATED, Json(tx.into())))
}

/// List transactions the caller is a party to.
///
/// GET /api/v1/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let repo = TransactionRepository::new(state.pool.clone());
    let transactions = repo
        .list_for_party(user_auth.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(transactions))
}

/// Get one transaction. Either party may read.
///
/// GET /api/v1/transactions/:transaction_id
pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Transaction>, ApiError> {
    let repo = TransactionRepository::new(state.pool.clone());
    let tx =
        find_authorized_transaction(&repo, transaction_id, user_auth.user_id, Operation::Read)
            .await?;
    Ok(Json(tx.into()))
}

/// Amend a transaction. From-owner only.
///
/// PATCH /api/v1/transactions/:transaction_id
pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    request.validate()?;

    let repo = TransactionRepository::new(state.pool.clone());
    find_authorized_transaction(&repo, transaction_id, user_auth.user_id, Operation::Update)
        .await?;

    let tx = repo
        .update(
            transaction_id,
            request.transaction_date,
            request.price,
            request.notes.as_deref(),
        )
        .await?;

    info!(transaction_id = %transaction_id, user_id = %user_auth.user_id, "Transaction amended");

    Ok(Json(tx.into()))
}

/// Delete a transaction. From-owner only.
///
/// DELETE /api/v1/transactions/:transaction_id
pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(user_auth): Extension<UserAuth>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = TransactionRepository::new(state.pool.clone());
    find_authorized_transaction(&repo, transaction_id, user_auth.user_id, Operation::Delete)
        .await?;

    repo.delete(transaction_id).await?;

    info!(transaction_id = %transaction_id, user_id = %user_auth.user_id, "Transaction deleted");

    Ok(StatusCode::NO_CONTENT)
}
