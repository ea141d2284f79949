use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{IssueTokenRequest, LoginRequest, LoginResponse, MessageResponse},
        extractors::AuthUser,
        middleware::require_auth,
        repo_types::AccessToken,
        services::{self, clearing_cookie, session_cookie},
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
    users::repo_types::User,
};

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/tokens", post(issue_token))
        .route("/auth/tokens/current", delete(revoke_current_token))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Validates a pre-issued token and stores it in the session cookie.
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let user = services::login(&state, &payload.token).await?;

    info!(user_id = user.id, "user logged in");
    Ok((
        jar.add(session_cookie(payload.token)),
        Json(LoginResponse {
            message: "Login successful".into(),
            user,
        }),
    ))
}

/// Clears the session cookie. The token itself stays valid.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(clearing_cookie()),
        Json(MessageResponse {
            message: "Logout successful".into(),
        }),
    )
}

#[instrument(skip(principal))]
pub async fn get_me(AuthUser(principal): AuthUser) -> Json<User> {
    Json(principal.user)
}

#[instrument(skip(state, principal, payload))]
pub async fn issue_token(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppJson(payload): AppJson<IssueTokenRequest>,
) -> Result<(StatusCode, Json<AccessToken>), AppError> {
    let issued = services::issue_token(&state, principal.user.id, payload.ttl_seconds).await?;
    info!(user_id = principal.user.id, token_id = issued.id, "token issued");
    Ok((StatusCode::CREATED, Json(issued)))
}

#[instrument(skip(state, principal))]
pub async fn revoke_current_token(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<StatusCode, AppError> {
    services::revoke_token(&state, &principal.token).await?;
    info!(user_id = principal.user.id, "token revoked");
    Ok(StatusCode::NO_CONTENT)
}
