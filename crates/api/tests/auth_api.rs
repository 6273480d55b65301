//! HTTP-level tests for registration, login and user reads.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    app_for, body_json, build_test_app, create_user, get, json_request, test_state, TEST_PASSWORD,
};

const BOUNDARY: &str = "beacon-test-boundary";

/// Build a `multipart/form-data` registration request.
fn register_request(
    email: &str,
    national_id: &str,
    photo: Option<(&str, &[u8])>,
) -> Request<Body> {
    let fields = [
        ("name", "Ana"),
        ("surname", "Rojas"),
        ("nationalId", national_id),
        ("email", email),
        ("phone", "555-0100"),
        ("password", TEST_PASSWORD),
        ("address", "Calle 1"),
    ];

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_registered_user_is_admin(pool: PgPool) {
    let app = build_test_app(pool);

    let first = app
        .clone()
        .oneshot(register_request("first@example.com", "nid-1", None))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(body_json(first).await["data"]["role"], "admin");

    let second = app
        .oneshot(register_request("second@example.com", "nid-2", None))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CREATED);
    assert_eq!(body_json(second).await["data"]["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_conflict(pool: PgPool) {
    let app = build_test_app(pool);

    app.clone()
        .oneshot(register_request("ana@example.com", "nid-3", None))
        .await
        .unwrap();
    let response = app
        .oneshot(register_request("ana@example.com", "nid-4", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_email_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = app
        .oneshot(register_request("not-an-email", "nid-5", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_photo_format_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = app
        .clone()
        .oneshot(register_request(
            "ana@example.com",
            "nid-6",
            Some(("me.gif", &b"GIF89a"[..])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let users = app.oneshot(get("/api/auth/users")).await.unwrap();
    assert_eq!(users.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn photo_is_stored_and_served(pool: PgPool) {
    let app = build_test_app(pool);

    let registered = app
        .clone()
        .oneshot(register_request(
            "ana@example.com",
            "30111222",
            Some(("my face.png", &b"\x89PNG fake"[..])),
        ))
        .await
        .unwrap();
    assert_eq!(registered.status(), StatusCode::CREATED);
    let id = body_json(registered).await["data"]["id"].as_i64().unwrap();

    let user = body_json(
        app.clone()
            .oneshot(get(&format!("/api/auth/user/{id}")))
            .await
            .unwrap(),
    )
    .await;
    let photo = user["data"]["photo"].as_str().unwrap().to_string();
    assert!(photo.starts_with("uploads/"));
    assert!(photo.ends_with("-my_face.png"));

    let served = app.oneshot(get(&format!("/{photo}"))).await.unwrap();
    assert_eq!(served.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_and_role(pool: PgPool) {
    create_user(&pool, "ana@example.com", "admin").await;
    let app = build_test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "email": "ana@example.com", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "admin");
    assert!(!json["data"]["token"].as_str().unwrap().is_empty());

    let wrong = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "email": "ana@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_unknown_email_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_reads_are_not_found_when_empty(pool: PgPool) {
    let app = build_test_app(pool);

    for uri in ["/api/auth/latest", "/api/auth/oldest", "/api/auth/users", "/api/auth/user/1"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_reads_never_expose_password_hash(pool: PgPool) {
    let first = create_user(&pool, "first@example.com", "admin").await;
    let second = create_user(&pool, "second@example.com", "user").await;
    let app = build_test_app(pool);

    let latest = body_json(app.clone().oneshot(get("/api/auth/latest")).await.unwrap()).await;
    assert_eq!(latest["data"]["id"], second.id);

    let oldest = body_json(app.clone().oneshot(get("/api/auth/oldest")).await.unwrap()).await;
    assert_eq!(oldest["data"]["id"], first.id);

    let users = body_json(app.oneshot(get("/api/auth/users")).await.unwrap()).await;
    let users = users["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("password_hash").is_none());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_insert_does_not_leave_photo_behind(pool: PgPool) {
    let state = test_state(pool);
    let upload_dir = state.config.uploads.dir.clone();
    let app = app_for(state);

    let first = app
        .clone()
        .oneshot(register_request(
            "first@example.com",
            "30111222",
            Some(("first.png", &b"first"[..])),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let same_national_id = app
        .oneshot(register_request(
            "second@example.com",
            "30111222",
            Some(("second.png", &b"second"[..])),
        ))
        .await
        .unwrap();
    assert_eq!(same_national_id.status(), StatusCode::CONFLICT);

    let mut stored = Vec::new();
    let mut entries = tokio::fs::read_dir(&upload_dir).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        stored.push(entry.file_name().to_string_lossy().into_owned());
    }
    assert_eq!(stored.len(), 1, "{stored:?}");
    assert!(stored[0].ends_with("-first.png"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_numeric_user_id_is_json_bad_request(pool: PgPool) {
    let app = build_test_app(pool);

    let response = app.oneshot(get("/api/auth/user/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
