pub mod alerts;
pub mod auth;
pub mod health;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /alerts                          list (GET), raise (POST), deactivate by user (DELETE)
/// /alerts/completed                completed alerts in range
/// /alerts/complete                 archive with comment (POST)
/// /alerts/stop-location            notify observers (POST)
/// /alerts/{id}                     user's alerts in range (GET), hard delete (DELETE)
///
/// /auth/register                   multipart registration (POST)
/// /auth/login                      login (POST)
/// /auth/latest, /auth/oldest       newest / oldest user
/// /auth/users                      all users
/// /auth/user/{id}                  one user
///
/// /stats                           record (POST), own statistics (GET), both require auth
/// /stats/general                   aggregate counters
/// ```
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/alerts", alerts::router())
        .nest("/auth", auth::router(&state.config.uploads))
        .nest("/stats", stats::router())
}
