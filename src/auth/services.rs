use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::{distributions::Alphanumeric, Rng};
use time::Duration;
use tracing::{error, warn};

use crate::{
    auth::{extractors::COOKIE_NAME, repo_types::AccessToken},
    db::with_deadline,
    error::{AppError, StoreError},
    state::AppState,
    users::repo_types::User,
};

pub const SESSION_TTL: Duration = Duration::days(7);
const TOKEN_LEN: usize = 48;

/// Cookie handed to the browser on login.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .max_age(SESSION_TTL)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Cookie that makes the browser drop the session cookie immediately.
pub fn clearing_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Checks a presented token and returns its owner.
pub async fn login(state: &AppState, token: &str) -> Result<User, AppError> {
    if token.is_empty() {
        return Err(AppError::InvalidArgument("token is required".into()));
    }

    let now = state.clock.now();
    match with_deadline(state.config.request_timeout, state.credentials.resolve(token, now)).await? {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound) => {
            warn!("login with unknown or expired token");
            Err(AppError::Unauthorized("invalid or expired token".into()))
        }
        Err(e) => {
            error!(error = %e, "token lookup failed");
            Err(AppError::Internal(anyhow::Error::new(e)))
        }
    }
}

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub async fn issue_token(
    state: &AppState,
    user_id: i64,
    ttl_seconds: Option<i64>,
) -> Result<AccessToken, AppError> {
    if matches!(ttl_seconds, Some(s) if s <= 0) {
        return Err(AppError::InvalidArgument("ttl_seconds must be positive".into()));
    }
    let now = state.clock.now();
    let expires_at = match ttl_seconds {
        Some(s) => Some(
            now.checked_add(Duration::seconds(s))
                .ok_or_else(|| AppError::InvalidArgument("ttl_seconds out of range".into()))?,
        ),
        None => None,
    };
    let token = generate_token();

    with_deadline(
        state.config.request_timeout,
        state.credentials.issue(user_id, &token, expires_at, now),
    )
    .await?
    .map_err(|e| AppError::from_store(e, "Token"))
}

pub async fn revoke_token(state: &AppState, token: &str) -> Result<(), AppError> {
    with_deadline(state.config.request_timeout, state.credentials.revoke(token))
        .await?
        .map_err(|e| AppError::from_store(e, "Token"))
}
