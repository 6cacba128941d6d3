#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use freeflow_api::auth::jwt::{generate_access_token, JwtConfig};
use freeflow_api::config::ServerConfig;
use freeflow_api::router::build_app;
use freeflow_api::session::Session;
use freeflow_api::state::AppState;
use freeflow_core::roles::ROLE_AUTHENTICATED;
use freeflow_core::types::DbId;
use freeflow_db::MemoryClient;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        database_url: "memory://".to_string(),
        db_max_connections: 1,
        log_json: false,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// A fresh in-memory backend with the migration constraints declared.
pub fn memory_client() -> Arc<MemoryClient> {
    Arc::new(MemoryClient::with_schema())
}

/// A session for `user_id` backed by `client`.
pub fn session_for(client: &Arc<MemoryClient>, user_id: DbId) -> Session {
    Session::new(client.clone(), user_id, ROLE_AUTHENTICATED)
}

/// Build the full application router over `client`, with the same
/// middleware stack production uses.
pub fn build_test_app(client: &Arc<MemoryClient>) -> Router {
    build_app(AppState::new(client.clone(), test_config()))
}

/// Mint a bearer token the test app accepts.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a request with an optional bearer token and JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
