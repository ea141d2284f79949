use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    articles::{
        dto::{ArticleRequest, ArticleResponse},
        services,
    },
    auth::{extractors::AuthUser, middleware::require_auth},
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/:id", get(get_article))
}

pub fn write_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/articles/:id", put(update_article).delete(delete_article))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[instrument(skip(state, payload))]
pub async fn create_article(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), AppError> {
    let published_at = payload.published_at()?;
    let draft = services::validate(payload.user_id, payload.title, payload.content, published_at)
        .inspect_err(|e| warn!(error = %e, "create_article rejected"))?;

    let article = services::create_article(&state, draft).await?;
    info!(article_id = article.id, user_id = article.user_id, "article created");
    Ok((StatusCode::CREATED, Json(article.into())))
}

#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = services::get_article(&state, id).await?;
    Ok(Json(article.into()))
}

#[instrument(skip(state))]
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleResponse>>, AppError> {
    let articles = services::list_articles(&state).await?;
    Ok(Json(articles.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, principal, payload))]
pub async fn update_article(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ArticleRequest>,
) -> Result<Json<ArticleResponse>, AppError> {
    let published_at = payload.published_at()?;
    let draft = services::validate(payload.user_id, payload.title, payload.content, published_at)
        .inspect_err(|e| warn!(error = %e, %id, "update_article rejected"))?;

    let article = services::update_article(&state, id, draft).await?;
    info!(article_id = id, by = principal.user.id, "article updated");
    Ok(Json(article.into()))
}

#[instrument(skip(state, principal))]
pub async fn delete_article(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    services::delete_article(&state, id).await?;
    info!(article_id = id, by = principal.user.id, "article deleted");
    Ok(StatusCode::NO_CONTENT)
}
