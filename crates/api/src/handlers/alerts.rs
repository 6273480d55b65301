//! Handlers for the `/alerts` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use beacon_core::date_range::DateRangeQuery;
use beacon_core::types::DbId;
use beacon_db::models::alert::{ActiveAlert, CompletedAlert};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /alerts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaiseAlertRequest {
    pub user_id: DbId,
    pub lat: f64,
    pub lng: f64,
}

/// Request body for `POST /alerts/complete`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAlertRequest {
    pub alert_id: DbId,
    pub comment: Option<String>,
}

/// Request body for endpoints addressed by user (`DELETE /alerts`,
/// `POST /alerts/stop-location`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub user_id: DbId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLocationResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user_id: DbId,
}

/// GET /api/alerts
pub async fn list_active(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ActiveAlert>>>> {
    let alerts = state.queries.list_active().await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// GET /api/alerts/completed?day&month&year
pub async fn list_completed(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DateRangeQuery>,
) -> AppResult<Json<DataResponse<Vec<CompletedAlert>>>> {
    let completed = state.queries.list_completed(&filter).await?;
    Ok(Json(DataResponse { data: completed }))
}

/// GET /api/alerts/{user_id}?day&month&year
///
/// 404 when the user has no alerts in range.
pub async fn list_by_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<DbId>,
    ApiQuery(filter): ApiQuery<DateRangeQuery>,
) -> AppResult<Json<DataResponse<Vec<ActiveAlert>>>> {
    let alerts = state.queries.list_by_user(user_id, &filter).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/alerts
///
/// 201 when a new alert was created, 200 when the user's existing alert moved.
pub async fn raise(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RaiseAlertRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ActiveAlert>>)> {
    let raised = state
        .lifecycle
        .raise_alert(input.user_id, input.lat, input.lng)
        .await?;

    let status = if raised.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: raised.alert })))
}

/// POST /api/alerts/complete
///
/// `data` is `null` when the alert was archived concurrently by another path.
pub async fn complete(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CompleteAlertRequest>,
) -> AppResult<Json<DataResponse<Option<CompletedAlert>>>> {
    let completed = state
        .lifecycle
        .complete_alert(input.alert_id, input.comment.as_deref())
        .await?;
    Ok(Json(DataResponse { data: completed }))
}

/// DELETE /api/alerts
///
/// Archive the user's active alert with the default comment.
pub async fn deactivate_by_user(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserRequest>,
) -> AppResult<Json<DataResponse<Option<CompletedAlert>>>> {
    let completed = state.lifecycle.deactivate_by_user(input.user_id).await?;
    Ok(Json(DataResponse { data: completed }))
}

/// DELETE /api/alerts/{alert_id}
///
/// Hard delete, no history.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(alert_id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<ActiveAlert>>> {
    let removed = state.lifecycle.delete_alert(alert_id).await?;
    Ok(Json(DataResponse { data: removed }))
}

/// POST /api/alerts/stop-location
pub async fn stop_location(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserRequest>,
) -> Json<DataResponse<StopLocationResponse>> {
    state.lifecycle.stop_location(input.user_id);
    Json(DataResponse {
        data: StopLocationResponse {
            kind: "stopLocation",
            user_id: input.user_id,
        },
    })
}
