//! In-memory repositories used by tests. Mirrors the Postgres schema:
//! unique emails and tokens, cascading deletes from users.

use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    articles::{
        repo::ArticleRepository,
        repo_types::{Article, ArticleDraft},
    },
    auth::{repo::CredentialStore, repo_types::AccessToken},
    error::StoreError,
    users::{repo::UserRepository, repo_types::User},
};

#[derive(Default)]
struct Tables {
    seq: i64,
    users: BTreeMap<i64, User>,
    tokens: BTreeMap<i64, AccessToken>,
    articles: BTreeMap<i64, Article>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.seq += 1;
        self.seq
    }

    /// Foreign key on `user_id`.
    fn require_user(&self, user_id: i64) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::Other(anyhow::anyhow!("user {user_id} does not exist")))
        }
    }
}

#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

impl MemoryDb {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Other(anyhow::anyhow!("memory store poisoned")))
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn create(&self, email: &str, name: &str, now: OffsetDateTime) -> Result<User, StoreError> {
        let mut t = self.lock()?;
        if t.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        let id = t.next_id();
        let user = User {
            id,
            email: email.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: i64) -> Result<User, StoreError> {
        self.lock()?.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    async fn update(
        &self,
        id: i64,
        email: &str,
        name: &str,
        now: OffsetDateTime,
    ) -> Result<User, StoreError> {
        let mut t = self.lock()?;
        if t.users.values().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Conflict);
        }
        let user = t.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.email = email.into();
        user.name = name.into();
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.users.remove(&id).ok_or(StoreError::NotFound)?;
        t.tokens.retain(|_, tok| tok.user_id != id);
        t.articles.retain(|_, a| a.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryDb {
    async fn resolve(&self, token: &str, now: OffsetDateTime) -> Result<User, StoreError> {
        let t = self.lock()?;
        let row = t
            .tokens
            .values()
            .find(|tok| tok.token == token && !tok.is_expired_at(now))
            .ok_or(StoreError::NotFound)?;
        t.users.get(&row.user_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn issue(
        &self,
        user_id: i64,
        token: &str,
        expires_at: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> Result<AccessToken, StoreError> {
        let mut t = self.lock()?;
        if t.tokens.values().any(|tok| tok.token == token) {
            return Err(StoreError::Conflict);
        }
        t.require_user(user_id)?;
        let id = t.next_id();
        let row = AccessToken {
            id,
            user_id,
            token: token.into(),
            expires_at,
            created_at: now,
        };
        t.tokens.insert(id, row.clone());
        Ok(row)
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.lock()?.tokens.retain(|_, tok| tok.token != token);
        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for MemoryDb {
    async fn create(&self, draft: &ArticleDraft, now: OffsetDateTime) -> Result<Article, StoreError> {
        let mut t = self.lock()?;
        t.require_user(draft.user_id)?;
        let id = t.next_id();
        let article = Article {
            id,
            user_id: draft.user_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            published_at: draft.published_at,
            created_at: now,
            updated_at: now,
        };
        t.articles.insert(id, article.clone());
        Ok(article)
    }

    async fn get(&self, id: i64) -> Result<Article, StoreError> {
        self.lock()?.articles.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.lock()?.articles.values().cloned().collect())
    }

    async fn update(
        &self,
        id: i64,
        draft: &ArticleDraft,
        now: OffsetDateTime,
    ) -> Result<Article, StoreError> {
        let mut t = self.lock()?;
        if !t.articles.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        t.require_user(draft.user_id)?;
        let article = t.articles.get_mut(&id).ok_or(StoreError::NotFound)?;
        article.user_id = draft.user_id;
        article.title = draft.title.clone();
        article.content = draft.content.clone();
        article.published_at = draft.published_at.or(article.published_at);
        article.updated_at = now;
        Ok(article.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.lock()?.articles.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
