use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::{
    articles::repo_types::{Article, ArticleDraft},
    error::StoreError,
};

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, draft: &ArticleDraft, now: OffsetDateTime) -> Result<Article, StoreError>;
    async fn get(&self, id: i64) -> Result<Article, StoreError>;
    /// All articles, id ascending.
    async fn list(&self) -> Result<Vec<Article>, StoreError>;
    /// Overwrites the row and sets `updated_at = now`. An unset
    /// `draft.published_at` keeps whatever publication time the row had.
    async fn update(
        &self,
        id: i64,
        draft: &ArticleDraft,
        now: OffsetDateTime,
    ) -> Result<Article, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgArticleRepository {
    db: PgPool,
}

impl PgArticleRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn create(&self, draft: &ArticleDraft, now: OffsetDateTime) -> Result<Article, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (user_id, title, content, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, user_id, title, content, published_at, created_at, updated_at
            "#,
        )
        .bind(draft.user_id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.published_at)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(article)
    }

    async fn get(&self, id: i64) -> Result<Article, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, user_id, title, content, published_at, created_at, updated_at
              FROM articles
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(article)
    }

    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let rows = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, user_id, title, content, published_at, created_at, updated_at
              FROM articles
             ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: i64,
        draft: &ArticleDraft,
        now: OffsetDateTime,
    ) -> Result<Article, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
               SET user_id = $2, title = $3, content = $4, published_at = COALESCE($5, published_at), updated_at = $6
             WHERE id = $1
            RETURNING id, user_id, title, content, published_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(draft.user_id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.published_at)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(article)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM articles WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
