use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Access token row. `expires_at` unset means the token never expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// Same predicate as the resolve query in `PgCredentialStore`; only the memory store needs it in Rust.
#[cfg(test)]
impl AccessToken {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }
}
