//! Handlers for the `/stats` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use beacon_core::date_range::DateRangeQuery;
use beacon_core::error::CoreError;
use beacon_core::types::Timestamp;
use beacon_db::models::statistic::{GeneralStatistic, Statistic};
use beacon_db::repositories::StatisticRepo;
use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /stats`.
#[derive(Debug, Deserialize)]
pub struct RecordStatisticRequest {
    pub action: String,
    /// Defaults to the time the request is handled.
    pub timestamp: Option<Timestamp>,
}

/// POST /api/stats
///
/// Record an action for the caller and bump its aggregate counter.
pub async fn record(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<RecordStatisticRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Statistic>>)> {
    let action = input.action.trim();
    if action.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "action is required".into(),
        )));
    }

    let timestamp = input.timestamp.unwrap_or_else(Utc::now);
    let statistic = StatisticRepo::record(&state.pool, auth.user_id, action, timestamp).await?;

    tracing::debug!(user_id = auth.user_id, role = %auth.role, action, "Statistic recorded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: statistic })))
}

/// GET /api/stats?day&month&year
///
/// The caller's own statistics inside the range.
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(filter): ApiQuery<DateRangeQuery>,
) -> AppResult<Json<DataResponse<Vec<Statistic>>>> {
    let range = filter.to_range()?;
    let statistics = StatisticRepo::list_for_user(
        &state.pool,
        auth.user_id,
        range.map(|r| r.start),
        range.map(|r| r.end),
    )
    .await?;
    Ok(Json(DataResponse { data: statistics }))
}

/// GET /api/stats/general?day&month&year
///
/// Stored counters without a range; counts recomputed from individual
/// statistics with one.
pub async fn general(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DateRangeQuery>,
) -> AppResult<Json<DataResponse<Vec<GeneralStatistic>>>> {
    let counts = match filter.to_range()? {
        Some(range) => {
            StatisticRepo::general_counts_between(&state.pool, range.start, range.end).await?
        }
        None => StatisticRepo::list_general(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: counts }))
}
