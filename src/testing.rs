//! Helpers for driving the full router in tests.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{app::build_app, state::AppState, users::repo_types::User};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect()
    }
}

pub fn app(state: &AppState) -> Router {
    build_app(state.clone())
}

/// Finishes `builder`, encoding `body` as JSON when given.
pub fn build(builder: axum::http::request::Builder, body: Option<Value>) -> Request<Body> {
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: Router, req: Request<Body>) -> TestResponse {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Sends `body` (if any) to `uri` with no credentials attached.
pub async fn call(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let req = build(Request::builder().method(method).uri(uri), body);
    send(app(state), req).await
}

/// Same as `call`, with `Authorization: Bearer <token>`.
pub async fn call_as(
    state: &AppState,
    token: &str,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> TestResponse {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    send(app(state), build(builder, body)).await
}

pub async fn seed_user(state: &AppState, email: &str) -> User {
    state
        .users
        .create(email, "Writer", state.clock.now())
        .await
        .unwrap()
}

/// Seeds a user plus a non-expiring token for it.
pub async fn seed_token(state: &AppState, email: &str, token: &str) -> User {
    let user = seed_user(state, email).await;
    state
        .credentials
        .issue(user.id, token, None, state.clock.now())
        .await
        .unwrap();
    user
}
