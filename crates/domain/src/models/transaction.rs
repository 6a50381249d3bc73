//! Animal transaction domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Kind of animal transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sale,
    Purchase,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Purchase => "purchase",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sale" => Ok(TransactionType::Sale),
            "purchase" => Ok(TransactionType::Purchase),
            "transfer" => Ok(TransactionType::Transfer),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction moving an animal between parties. The receiving party is
/// optional for sales to outside buyers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub transaction_type: TransactionType,
    pub transaction_date: NaiveDate,
    pub from_owner_user_id: Uuid,
    pub to_owner_user_id: Option<Uuid>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Whether the user is a party to this transaction.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.from_owner_user_id == user_id || self.to_owner_user_id == Some(user_id)
    }
}

/// Request payload for recording a transaction.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTransactionRequest {
    pub animal_id: Uuid,
    pub transaction_type: TransactionType,
    pub transaction_date: NaiveDate,
    pub to_owner_user_id: Option<Uuid>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    pub notes: Option<String>,
}

/// Request payload for amending a recorded transaction.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTransactionRequest {
    pub transaction_date: Option<NaiveDate>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_round_trip() {
        assert_eq!(
            "transfer".parse::<TransactionType>().unwrap(),
            TransactionType::Transfer
        );
        assert_eq!(TransactionType::Sale.to_string(), "sale");
        assert!("gift".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_involves_checks_both_parties() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let other = Uuid::new_v4();
        let tx = Transaction {
            id: Uuid::new_v4(),
            animal_id: Uuid::new_v4(),
            transaction_type: TransactionType::Sale,
            transaction_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            from_owner_user_id: from,
            to_owner_user_id: Some(to),
            price: Some(1200.0),
            notes: None,
            created_at: Utc::now(),
        };
        assert!(tx.involves(from));
        assert!(tx.involves(to));
        assert!(!tx.involves(other));
    }

    #[test]
    fn test_involves_with_no_receiver() {
        let from = Uuid::new_v4();
        let tx = Transaction {
            id: Uuid::new_v4(),
            animal_id: Uuid::new_v4(),
            transaction_type: TransactionType::Sale,
            transaction_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            from_owner_user_id: from,
            to_owner_user_id: None,
            price: None,
            notes: None,
            created_at: Utc::now(),
        };
        assert!(tx.involves(from));
        assert!(!tx.involves(Uuid::new_v4()));
    }
}
