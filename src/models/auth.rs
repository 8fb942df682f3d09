//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Login / registration response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: super::user::UserResponse,
}

/// Current identity, as recovered from a validated token
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    /// None when the subject has no user row (e.g. removed after issuance)
    pub user: Option<super::user::UserResponse>,
}
