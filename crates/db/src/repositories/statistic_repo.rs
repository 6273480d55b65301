//! Repository for `statistics` and `general_statistics`.

use beacon_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::statistic::{GeneralStatistic, Statistic};

const COLUMNS: &str = "id, user_id, action, timestamp";

pub struct StatisticRepo;

impl StatisticRepo {
    /// Record one action for a user and bump its aggregate counter.
    ///
    /// Both writes share a transaction so the counter never drifts from the
    /// per-user rows.
    pub async fn record(
        pool: &PgPool,
        user_id: DbId,
        action: &str,
        timestamp: Timestamp,
    ) -> Result<Statistic, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO statistics (user_id, action, timestamp)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let statistic = sqlx::query_as::<_, Statistic>(&insert)
            .bind(user_id)
            .bind(action)
            .bind(timestamp)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO general_statistics (action, count)
             VALUES ($1, 1)
             ON CONFLICT (action) DO UPDATE SET count = general_statistics.count + 1",
        )
        .bind(action)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(statistic)
    }

    /// A user's statistics inside `[start, end]`, oldest first. `None`
    /// bounds are open.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Vec<Statistic>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM statistics
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR timestamp >= $2)
               AND ($3::timestamptz IS NULL OR timestamp <= $3)
             ORDER BY timestamp, id"
        );
        sqlx::query_as::<_, Statistic>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Stored aggregate counters, by action name.
    pub async fn list_general(pool: &PgPool) -> Result<Vec<GeneralStatistic>, sqlx::Error> {
        sqlx::query_as::<_, GeneralStatistic>(
            "SELECT action, count FROM general_statistics ORDER BY action",
        )
        .fetch_all(pool)
        .await
    }

    /// Per-action counts recomputed from `statistics` inside `[start, end]`.
    pub async fn general_counts_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<GeneralStatistic>, sqlx::Error> {
        sqlx::query_as::<_, GeneralStatistic>(
            "SELECT action, COUNT(*) AS count FROM statistics
             WHERE timestamp >= $1 AND timestamp <= $2
             GROUP BY action
             ORDER BY action",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }
}
