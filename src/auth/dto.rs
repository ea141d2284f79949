use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub token: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Request body for issuing a new token to the caller.
#[derive(Debug, Default, Deserialize)]
pub struct IssueTokenRequest {
    /// Lifetime in seconds; absent means the token never expires.
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}
