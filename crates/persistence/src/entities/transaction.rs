//! Transaction entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::transaction::TransactionType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for transaction_type that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionTypeDb {
    Sale,
    Purchase,
    Transfer,
}

impl From<TransactionTypeDb> for TransactionType {
    fn from(db: TransactionTypeDb) -> Self {
        match db {
            TransactionTypeDb::Sale => TransactionType::Sale,
            TransactionTypeDb::Purchase => TransactionType::Purchase,
            TransactionTypeDb::Transfer => TransactionType::Transfer,
        }
    }
}

impl From<TransactionType> for TransactionTypeDb {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Sale => TransactionTypeDb::Sale,
            TransactionType::Purchase => TransactionTypeDb::Purchase,
            TransactionType::Transfer => TransactionTypeDb::Transfer,
        }
    }
}

/// Database row mapping for the transactions table.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionEntity {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub transaction_type: TransactionTypeDb,
    pub transaction_date: NaiveDate,
    pub from_owner_user_id: Uuid,
    pub to_owner_user_id: Option<Uuid>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionEntity> for domain::models::Transaction {
    fn from(entity: TransactionEntity) -> Self {
        Self {
            id: entity.id,
            animal_id: entity.animal_id,
            transaction_type: entity.transaction_type.into(),
            transaction_date: entity.transaction_date,
            from_owner_user_id: entity.from_owner_user_id,
            to_owner_user_id: entity.to_owner_user_id,
            price: entity.price,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
