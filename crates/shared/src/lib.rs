//! Shared utilities and common types for the Farm Manager backend.
//!
//! This crate provides functionality used across the other crates:
//! - JWT issuance and validation
//! - Password hashing with Argon2id
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod validation;
