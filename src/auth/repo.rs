use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::{auth::repo_types::AccessToken, error::StoreError, users::repo_types::User};

/// Bearer tokens and the users they belong to.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Owner of `token`. `NotFound` when the token is unknown or its expiry is
    /// not after `now`.
    async fn resolve(&self, token: &str, now: OffsetDateTime) -> Result<User, StoreError>;

    /// `Conflict` when the token string is already taken.
    async fn issue(
        &self,
        user_id: i64,
        token: &str,
        expires_at: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> Result<AccessToken, StoreError>;

    /// Deleting an unknown token is not an error.
    async fn revoke(&self, token: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn resolve(&self, token: &str, now: OffsetDateTime) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.created_at, u.updated_at
              FROM access_tokens t
              JOIN users u ON u.id = t.user_id
             WHERE t.token = $1
               AND (t.expires_at IS NULL OR t.expires_at > $2)
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn issue(
        &self,
        user_id: i64,
        token: &str,
        expires_at: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> Result<AccessToken, StoreError> {
        let row = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (user_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query(r#"DELETE FROM access_tokens WHERE token = $1"#)
            .bind(token)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
