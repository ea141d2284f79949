use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Extensions, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{error::AppError, users::repo_types::User};

/// Name of the cookie carrying the bearer token for browser clients.
pub const COOKIE_NAME: &str = "auth_token";

/// Pulls the candidate bearer token out of a request.
///
/// A `Bearer` Authorization header wins outright, even when its token part is
/// blank (that request simply has no token). Any other non-empty header value
/// is ignored and the `auth_token` cookie is consulted instead.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    if let Some(value) = header {
        if let Some((scheme, rest)) = value.split_once(' ') {
            if scheme.eq_ignore_ascii_case("bearer") {
                let token = rest.trim();
                return (!token.is_empty()).then(|| token.to_string());
            }
        }
    }

    CookieJar::from_headers(headers)
        .get(COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Identity bound to a request by the auth middleware.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    /// Token the request authenticated with.
    pub token: String,
}

impl Principal {
    pub fn from_extensions(extensions: &Extensions) -> Option<&Principal> {
        extensions.get::<Principal>()
    }
}

/// Handler argument for routes behind `require_auth`.
pub struct AuthUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Principal::from_extensions(&parts.extensions)
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("authentication required".into()))
    }
}
