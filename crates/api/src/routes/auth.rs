//! Route definitions for the `/auth` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::config::UploadConfig;
use crate::handlers::auth;
use crate::state::AppState;

/// Headroom above the photo limit for the text fields of the form.
const FORM_FIELDS_ALLOWANCE: usize = 64 * 1024;

/// Routes mounted at `/auth`.
pub fn router(uploads: &UploadConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            post(auth::register)
                .layer(DefaultBodyLimit::max(uploads.max_bytes + FORM_FIELDS_ALLOWANCE)),
        )
        .route("/login", post(auth::login))
        .route("/latest", get(auth::latest))
        .route("/oldest", get(auth::oldest))
        .route("/users", get(auth::list_users))
        .route("/user/{id}", get(auth::get_user))
}
