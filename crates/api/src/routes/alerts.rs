//! Route definitions for the `/alerts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// `{id}` is a user id for `GET` and an alert id for `DELETE`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(alerts::list_active)
                .post(alerts::raise)
                .delete(alerts::deactivate_by_user),
        )
        .route("/completed", get(alerts::list_completed))
        .route("/complete", post(alerts::complete))
        .route("/stop-location", post(alerts::stop_location))
        .route("/{id}", get(alerts::list_by_user).delete(alerts::delete))
}
