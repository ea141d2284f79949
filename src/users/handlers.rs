use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
    users::{dto::UserRequest, repo_types::User, services},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let (email, name) =
        services::validate(payload).inspect_err(|e| warn!(error = %e, "create_user rejected"))?;
    let user = services::create_user(&state, &email, &name).await?;
    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<User>, AppError> {
    Ok(Json(services::get_user(&state, id).await?))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(services::list_users(&state).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UserRequest>,
) -> Result<Json<User>, AppError> {
    let (email, name) = services::validate(payload)
        .inspect_err(|e| warn!(error = %e, %id, "update_user rejected"))?;
    let user = services::update_user(&state, id, &email, &name).await?;
    info!(user_id = id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    services::delete_user(&state, id).await?;
    info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
