use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    articles::repo_types::{Article, ArticleState},
    error::AppError,
};

/// Body of create and update. Missing fields default to empty so the
/// required-field check reports them as 400s.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleRequest {
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Unix seconds; absent or null means draft.
    #[serde(default)]
    pub published_at: Option<i64>,
}

impl ArticleRequest {
    pub fn published_at(&self) -> Result<Option<OffsetDateTime>, AppError> {
        self.published_at
            .map(|secs| {
                OffsetDateTime::from_unix_timestamp(secs)
                    .map_err(|_| AppError::InvalidArgument("published_at out of range".into()))
            })
            .transpose()
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    #[serde(flatten)]
    pub article: Article,
    pub state: ArticleState,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        let state = article.state();
        Self { article, state }
    }
}
