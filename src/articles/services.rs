use time::OffsetDateTime;

use crate::{
    articles::repo_types::{Article, ArticleDraft},
    db::with_deadline,
    error::AppError,
    state::AppState,
};

const ENTITY: &str = "Article";

/// Required-field check shared by create and update. Runs before any write.
pub fn validate(
    user_id: i64,
    title: String,
    content: String,
    published_at: Option<OffsetDateTime>,
) -> Result<ArticleDraft, AppError> {
    if user_id <= 0 || title.is_empty() || content.is_empty() {
        return Err(AppError::InvalidArgument(
            "user_id, title, and content are required".into(),
        ));
    }
    Ok(ArticleDraft {
        user_id,
        title,
        content,
        published_at,
    })
}

pub async fn create_article(state: &AppState, draft: ArticleDraft) -> Result<Article, AppError> {
    let now = state.clock.now();
    with_deadline(state.config.request_timeout, state.articles.create(&draft, now))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

pub async fn get_article(state: &AppState, id: i64) -> Result<Article, AppError> {
    with_deadline(state.config.request_timeout, state.articles.get(id))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

pub async fn list_articles(state: &AppState) -> Result<Vec<Article>, AppError> {
    with_deadline(state.config.request_timeout, state.articles.list())
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

/// Rewrites the article and always bumps `updated_at`, even if nothing else changed.
/// An unset `published_at` keeps the stored publication time rather than
/// clearing it, so a published article never goes back to draft.
pub async fn update_article(
    state: &AppState,
    id: i64,
    draft: ArticleDraft,
) -> Result<Article, AppError> {
    let now = state.clock.now();
    with_deadline(state.config.request_timeout, state.articles.update(id, &draft, now))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

pub async fn delete_article(state: &AppState, id: i64) -> Result<(), AppError> {
    with_deadline(state.config.request_timeout, state.articles.delete(id))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{articles::repo_types::ArticleState, clock::ManualClock};

    /// Memory store starts its ids at 1, so the first user is the author `draft` expects.
    async fn seed_author(state: &AppState) {
        let author = state
            .users
            .create("author@example.com", "Author", state.clock.now())
            .await
            .unwrap();
        assert_eq!(author.id, 1);
    }

    async fn authored_state() -> AppState {
        let state = AppState::fake();
        seed_author(&state).await;
        state
    }

    fn draft(title: &str, content: &str, published_at: Option<OffsetDateTime>) -> ArticleDraft {
        validate(1, title.into(), content.into(), published_at).expect("valid draft")
    }

    #[test]
    fn validate_rejects_missing_fields() {
        for (user_id, title, content) in [(1, "", "B"), (1, "A", ""), (0, "A", "B"), (-3, "A", "B")] {
            let err = validate(user_id, title.into(), content.into(), None).unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn rejected_create_persists_nothing() {
        let state = AppState::fake();
        assert!(validate(1, "".into(), "B".into(), None).is_err());
        assert!(list_articles(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn draft_round_trips_as_draft() {
        let state = authored_state().await;
        let created = create_article(&state, draft("A", "B", None)).await.unwrap();
        let read = get_article(&state, created.id).await.unwrap();
        assert_eq!(read.published_at, None);
        assert_eq!(read.state(), ArticleState::Draft);
    }

    #[tokio::test]
    async fn publish_time_round_trips() {
        let state = authored_state().await;
        let at = OffsetDateTime::from_unix_timestamp(1_650_000_000).unwrap();
        let created = create_article(&state, draft("A", "B", Some(at))).await.unwrap();
        let read = get_article(&state, created.id).await.unwrap();
        assert_eq!(read.published_at, Some(at));
        assert_eq!(read.state(), ArticleState::Published);
    }

    #[tokio::test]
    async fn update_bumps_timestamp_without_field_changes() {
        let clock = Arc::new(ManualClock::at(1_700_000_000));
        let state = AppState::fake_with_clock(clock.clone());
        seed_author(&state).await;
        let created = create_article(&state, draft("A", "B", None)).await.unwrap();

        clock.advance(time::Duration::seconds(30));
        let updated = update_article(&state, created.id, draft("A", "B", None)).await.unwrap();

        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, created.title);
    }

    #[tokio::test]
    async fn update_without_publish_time_keeps_publication() {
        let state = authored_state().await;
        let at = OffsetDateTime::from_unix_timestamp(1_650_000_000).unwrap();
        let created = create_article(&state, draft("A", "B", Some(at))).await.unwrap();
        let updated = update_article(&state, created.id, draft("A2", "B2", None)).await.unwrap();
        assert_eq!(updated.published_at, Some(at));
        assert_eq!(updated.title, "A2");
    }

    #[tokio::test]
    async fn missing_article_is_not_found() {
        let state = authored_state().await;
        assert!(matches!(get_article(&state, 999).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            update_article(&state, 999, draft("A", "B", None)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(delete_article(&state, 999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let state = authored_state().await;
        for title in ["first", "second", "third"] {
            create_article(&state, draft(title, "body", None)).await.unwrap();
        }
        let ids: Vec<i64> = list_articles(&state).await.unwrap().iter().map(|a| a.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let state = authored_state().await;
        let created = create_article(&state, draft("A", "B", None)).await.unwrap();
        delete_article(&state, created.id).await.unwrap();
        assert!(matches!(get_article(&state, created.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn unknown_author_is_rejected_by_the_store() {
        let state = AppState::fake();
        let err = create_article(&state, draft("A", "B", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(list_articles(&state).await.unwrap().is_empty());
    }
}
