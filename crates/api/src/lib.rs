//! HTTP API for the Farm Manager backend.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
