use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    db::with_deadline,
    error::AppError,
    state::AppState,
    users::{dto::UserRequest, repo_types::User},
};

const ENTITY: &str = "User";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Normalizes and checks the body; returns `(email, name)`.
pub fn validate(payload: UserRequest) -> Result<(String, String), AppError> {
    let email = payload.email.trim().to_lowercase();
    let name = payload.name.trim().to_string();
    if email.is_empty() || name.is_empty() {
        return Err(AppError::InvalidArgument("email and name are required".into()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::InvalidArgument("invalid email".into()));
    }
    Ok((email, name))
}

pub async fn create_user(state: &AppState, email: &str, name: &str) -> Result<User, AppError> {
    let now = state.clock.now();
    with_deadline(state.config.request_timeout, state.users.create(email, name, now))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

pub async fn get_user(state: &AppState, id: i64) -> Result<User, AppError> {
    with_deadline(state.config.request_timeout, state.users.get(id))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

pub async fn list_users(state: &AppState) -> Result<Vec<User>, AppError> {
    with_deadline(state.config.request_timeout, state.users.list())
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

pub async fn update_user(
    state: &AppState,
    id: i64,
    email: &str,
    name: &str,
) -> Result<User, AppError> {
    let now = state.clock.now();
    with_deadline(state.config.request_timeout, state.users.update(id, email, name, now))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}

pub async fn delete_user(state: &AppState, id: i64) -> Result<(), AppError> {
    with_deadline(state.config.request_timeout, state.users.delete(id))
        .await?
        .map_err(|e| AppError::from_store(e, ENTITY))
}
