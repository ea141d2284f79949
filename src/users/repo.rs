use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::{error::StoreError, users::repo_types::User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, email: &str, name: &str, now: OffsetDateTime) -> Result<User, StoreError>;
    async fn get(&self, id: i64) -> Result<User, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn update(
        &self,
        id: i64,
        email: &str,
        name: &str,
        now: OffsetDateTime,
    ) -> Result<User, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, email: &str, name: &str, now: OffsetDateTime) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, email, name, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn get(&self, id: i64) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, created_at, updated_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, created_at, updated_at FROM users ORDER BY id"#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: i64,
        email: &str,
        name: &str,
        now: OffsetDateTime,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET email = $2, name = $3, updated_at = $4
             WHERE id = $1
            RETURNING id, email, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
