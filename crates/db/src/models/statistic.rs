//! Usage statistic models.

use beacon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One tracked action by one user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    pub id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub timestamp: Timestamp,
}

/// Aggregate count for an action across all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct GeneralStatistic {
    pub action: String,
    pub count: i64,
}
