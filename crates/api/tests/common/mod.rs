#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use beacon_api::auth::jwt::{generate_access_token, JwtConfig};
use beacon_api::auth::password::hash_password;
use beacon_api::config::{ServerConfig, UploadConfig};
use beacon_api::router::build_app_router;
use beacon_api::state::AppState;
use beacon_api::ws::WsManager;
use beacon_db::models::user::{CreateUser, User};
use beacon_db::repositories::UserRepo;
use beacon_events::EventBus;
use beacon_lifecycle::SweeperConfig;
use http_body_util::BodyExt;
use sqlx::PgPool;

pub const TEST_PASSWORD: &str = "hunter22";

/// Build a test `ServerConfig` with safe defaults and a private upload dir.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        uploads: UploadConfig {
            dir: std::env::temp_dir().join(format!("beacon-test-{}", uuid::Uuid::new_v4())),
            max_bytes: 2 * 1024 * 1024,
        },
        sweeper: SweeperConfig {
            interval: Duration::from_secs(60),
            max_age: chrono::Duration::minutes(40),
        },
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(
        pool,
        Arc::new(test_config()),
        Arc::new(WsManager::new()),
        Arc::new(EventBus::default()),
    )
}

/// Build the full application router, sharing `main.rs`'s middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = test_state(pool);
    app_for(state)
}

pub fn app_for(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    build_app_router(state, &config)
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Insert a user directly, bypassing the registration form.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Ana".into(),
            surname: "Rojas".into(),
            national_id: format!("nid-{email}"),
            email: email.into(),
            phone: "555-0100".into(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            address: "Calle 1".into(),
            photo: None,
            role: role.into(),
        },
    )
    .await
    .unwrap()
}

pub fn bearer_for(user: &User) -> String {
    let token = generate_access_token(user.id, &user.role, &test_config().jwt).unwrap();
    format!("Bearer {token}")
}
