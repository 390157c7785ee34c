#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use tower::ServiceExt;

use devconnector::api::{create_router, AppState};
use devconnector::config::Config;

pub fn test_config(github_api_url: &str) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_min_connections: 1,
        request_timeout_secs: 10,
        jwt_secret: "test-secret".to_string(),
        token_expiry_secs: 3600,
        github_api_url: github_api_url.to_string(),
        github_client_id: None,
        github_client_secret: None,
    }
}

/// A single shared connection keeps the in-memory database alive for the
/// whole test.
pub async fn memory_db() -> Pool<Sqlite> {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("migrations");

    db
}

pub async fn app_with_github(github_api_url: &str) -> Router {
    let config = Arc::new(test_config(github_api_url));
    let state = AppState::new(memory_db().await, config).expect("state");
    create_router(state)
}

pub async fn app() -> Router {
    app_with_github("http://127.0.0.1:9").await
}

/// Fire one request at the router and decode the body: JSON when it parses,
/// a JSON string for plain text, `Null` when empty.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

pub async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/user",
        None,
        Some(json!({ "name": name, "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");

    body["token"].as_str().expect("token").to_string()
}

pub async fn user_id(app: &Router, token: &str) -> String {
    let (status, body) = send(app, Method::GET, "/api/auth", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    body["_id"].as_str().expect("user id").to_string()
}

pub async fn create_post(app: &Router, token: &str, text: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/post",
        Some(token),
        Some(json!({ "text": text })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create post failed: {body}");

    body["_id"].as_str().expect("post id").to_string()
}

/// Serve the app on an ephemeral port and return its base URL.
pub async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = app().await;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    format!("http://{}", addr)
}
