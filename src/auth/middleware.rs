use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};

use crate::{
    auth::extractors::{extract_token, Principal},
    db::with_deadline,
    error::{AppError, StoreError},
    state::AppState,
};

/// Rejects the request unless it carries a token that resolves to a user;
/// otherwise binds the `Principal` into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(req.headers()) else {
        warn!(uri = %req.uri(), "no token provided");
        return Err(AppError::Unauthorized("no token provided".into()));
    };

    let now = state.clock.now();
    let lookup = state.credentials.resolve(&token, now);
    let user = match with_deadline(state.config.request_timeout, lookup).await? {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            warn!(uri = %req.uri(), "invalid or expired token");
            return Err(AppError::Unauthorized("invalid or expired token".into()));
        }
        Err(e) => {
            error!(error = %e, "token lookup failed");
            return Err(AppError::Internal(anyhow::Error::new(e)));
        }
    };

    debug!(user_id = user.id, "request authenticated");
    req.extensions_mut().insert(Principal { user, token });
    Ok(next.run(req).await)
}
