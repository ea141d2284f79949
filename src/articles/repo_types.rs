use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Article record in the database. `published_at` unset means draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleState {
    Draft,
    Published,
}

impl Article {
    pub fn state(&self) -> ArticleState {
        match self.published_at {
            Some(_) => ArticleState::Published,
            None => ArticleState::Draft,
        }
    }
}

/// Validated field set written by create and update.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub published_at: Option<OffsetDateTime>,
}
