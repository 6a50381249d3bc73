//! Transaction repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TransactionEntity, TransactionTypeDb};
use crate::metrics::QueryTimer;

/// Repository for transaction database operations.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        animal_id: Uuid,
        transaction_type: TransactionTypeDb,
        transaction_date: NaiveDate,
        from_owner_user_id: Uuid,
        to_owner_user_id: Option<Uuid>,
        price: Option<f64>,
        notes: Option<&str>,
    ) -> Result<TransactionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_transaction");
        tracing::debug!(animal_id = %animal_id, from_owner_user_id = %from_owner_user_id, "inserting transaction");
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            INSERT INTO transactions (animal_id, transaction_type, transaction_date,
                from_owner_user_id, to_owner_user_id, price, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, animal_id, transaction_type, transaction_date, from_owner_user_id, to_owner_user_id, price, notes, created_at
            "#,
        )
        .bind(animal_id)
        .bind(transaction_type)
        .bind(transaction_date)
        .bind(from_owner_user_id)
        .bind(to_owner_user_id)
        .bind(price)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a transaction by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_transaction_by_id");
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            SELECT id, animal_id, transaction_type, transaction_date, from_owner_user_id, to_owner_user_id, price, notes, created_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List transactions the user is a party to, on either side.
    pub async fn list_for_party(&self, user_id: Uuid) -> Result<Vec<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_transactions_for_party");
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            SELECT id, animal_id, transaction_type, transaction_date, from_owner_user_id, to_owner_user_id, price, notes, created_at
            FROM transactions
            WHERE from_owner_user_id = $1 OR to_owner_user_id = $1
            ORDER BY transaction_date DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Amend a recorded transaction.
    pub async fn update(
        &self,
        transaction_id: Uuid,
        transaction_date: Option<NaiveDate>,
        price: Option<f64>,
        notes: Option<&str>,
    ) -> Result<TransactionEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_transaction");
        tracing::debug!(transaction_id = %transaction_id, "updating transaction");
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            UPDATE transactions
            SET
                transaction_date = COALESCE($2, transaction_date),
                price = COALESCE($3, price),
                notes = COALESCE($4, notes)
            WHERE id = $1
            RETURNING id, animal_id, transaction_type, transaction_date, from_owner_user_id, to_owner_user_id, price, notes, created_at
            "#,
        )
        .bind(transaction_id)
        .bind(transaction_date)
        .bind(price)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a transaction.
    pub async fn delete(&self, transaction_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_transaction");
        tracing::debug!(transaction_id = %transaction_id, "deleting transaction");
        let result = sqlx::query(
            r#"
            DELETE FROM transactions WHERE id = $1
            "#,
        )
        .bind(transaction_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: TransactionRepository tests require a database connection and are covered by integration tests
}
