//! Repository for the read side of `completed_alerts`.
//!
//! Rows are only ever written by [`AlertRepo::archive`](super::AlertRepo::archive).

use beacon_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::alert::CompletedAlert;

/// Column list shared with the archival insert.
pub(crate) const COLUMNS: &str =
    "id, alert_id, user_id, lat, lng, user_info, comment, completed_at, created_at";

pub struct CompletedAlertRepo;

impl CompletedAlertRepo {
    /// List completed alerts with `completed_at` inside `[start, end]`,
    /// oldest first. `None` bounds are open.
    pub async fn list(
        pool: &PgPool,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Vec<CompletedAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM completed_alerts
             WHERE ($1::timestamptz IS NULL OR completed_at >= $1)
               AND ($2::timestamptz IS NULL OR completed_at <= $2)
             ORDER BY completed_at, id"
        );
        sqlx::query_as::<_, CompletedAlert>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
