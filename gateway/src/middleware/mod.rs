//! Gateway middleware

pub mod auth;

pub use auth::{bearer_token, current_user_id, BearerToken};
