//! Domain layer for the Farm Manager backend.
//!
//! This crate contains:
//! - Domain models for the farm access graph (users, farms, lots, animals,
//!   groups, events, transactions)
//! - The access resolver and relation consistency services
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::{DomainError, RelationViolation};
