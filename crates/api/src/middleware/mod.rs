pub mod auth;
pub mod logging;

pub use auth::{require_user_auth, UserAuth};
