//! Repository for the `alerts` table and the archival transition into
//! `completed_alerts`.

use beacon_core::snapshot::UserInfoSnapshot;
use beacon_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::models::alert::{
    ActiveAlert, ArchivedAlert, Archival, CompletedAlert, UpsertOutcome, UpsertedAlert,
};
use crate::repositories::completed_alert_repo::COLUMNS as COMPLETED_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, lat, lng, is_active, user_info, created_at, updated_at";

#[derive(FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    alert: ActiveAlert,
    inserted: bool,
}

/// Provides the active-alert operations.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert an active alert for `user_id`, or move the existing one.
    ///
    /// A single statement arbitrated by the partial unique index
    /// `uq_alerts_active_user`, so concurrent callers for the same user can
    /// never produce two active rows. On conflict only `lat`, `lng` and
    /// `updated_at` change; the stored snapshot and `created_at` are kept.
    /// `xmax = 0` holds only for freshly inserted tuples.
    pub async fn upsert_active(
        pool: &PgPool,
        user_id: DbId,
        lat: f64,
        lng: f64,
        user_info: &UserInfoSnapshot,
    ) -> Result<UpsertedAlert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (user_id, lat, lng, user_info)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) WHERE is_active
             DO UPDATE SET lat = EXCLUDED.lat, lng = EXCLUDED.lng, updated_at = NOW()
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(user_id)
            .bind(lat)
            .bind(lng)
            .bind(Json(user_info))
            .fetch_one(pool)
            .await?;

        let outcome = if row.inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        };
        Ok(UpsertedAlert {
            alert: row.alert,
            outcome,
        })
    }

    /// Find an active alert by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ActiveAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, ActiveAlert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the user's active alert, if any.
    pub async fn find_active_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<ActiveAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE user_id = $1 AND is_active");
        sqlx::query_as::<_, ActiveAlert>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List every active alert, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ActiveAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts ORDER BY created_at, id");
        sqlx::query_as::<_, ActiveAlert>(&query)
            .fetch_all(pool)
            .await
    }

    /// List a user's alerts created inside `[start, end]`; `None` bounds are open.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Vec<ActiveAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR created_at >= $2)
               AND ($3::timestamptz IS NULL OR created_at <= $3)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ActiveAlert>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete an active alert. Returns the removed row, or `None` if it
    /// was already gone.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<ActiveAlert>, sqlx::Error> {
        let query = format!("DELETE FROM alerts WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ActiveAlert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move an active alert into `completed_alerts`.
    ///
    /// Delete and insert run in one transaction. The `DELETE ... RETURNING`
    /// takes the row lock, so of two concurrent archivals exactly one sees the
    /// row; the other gets `None` and writes nothing.
    pub async fn archive(
        pool: &PgPool,
        id: DbId,
        archival: &Archival,
    ) -> Result<Option<ArchivedAlert>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let delete = format!("DELETE FROM alerts WHERE id = $1 RETURNING {COLUMNS}");
        let removed = sqlx::query_as::<_, ActiveAlert>(&delete)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(removed) = removed else {
            tx.rollback().await?;
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO completed_alerts
                (alert_id, user_id, lat, lng, user_info, comment, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COMPLETED_COLUMNS}"
        );
        let completed = sqlx::query_as::<_, CompletedAlert>(&insert)
            .bind(removed.id)
            .bind(removed.user_id)
            .bind(removed.lat)
            .bind(removed.lng)
            .bind(Json(&archival.user_info))
            .bind(&archival.comment)
            .bind(archival.completed_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(ArchivedAlert { removed, completed }))
    }
}
