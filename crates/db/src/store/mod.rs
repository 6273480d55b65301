//! Storage seams consumed by the alert lifecycle engine.
//!
//! [`AlertStore`] owns active and completed alerts; [`UserDirectory`] answers
//! contact lookups. Both have a PostgreSQL implementation ([`pg`]) and an
//! in-process one ([`memory`]) that keeps the same atomicity guarantees under
//! a single mutex.

use async_trait::async_trait;
use beacon_core::date_range::DateRange;
use beacon_core::snapshot::{UserContact, UserInfoSnapshot};
use beacon_core::types::DbId;

use crate::models::alert::{ActiveAlert, ArchivedAlert, Archival, CompletedAlert, UpsertedAlert};

pub mod memory;
pub mod pg;

/// Failure talking to the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached in time (pool exhausted, closed, I/O).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Persistence for active and completed alerts.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Atomic find-or-insert on `{user_id, is_active}`.
    ///
    /// Creates an alert carrying `user_info`, or moves the user's existing
    /// active alert to `lat`/`lng` leaving its snapshot and `created_at`
    /// untouched.
    async fn upsert_active(
        &self,
        user_id: DbId,
        lat: f64,
        lng: f64,
        user_info: &UserInfoSnapshot,
    ) -> Result<UpsertedAlert, StoreError>;

    async fn find_alert(&self, id: DbId) -> Result<Option<ActiveAlert>, StoreError>;

    async fn find_active_by_user(&self, user_id: DbId)
        -> Result<Option<ActiveAlert>, StoreError>;

    /// Every active alert, oldest first.
    async fn list_active(&self) -> Result<Vec<ActiveAlert>, StoreError>;

    /// A user's alerts whose `created_at` falls inside `range`.
    async fn list_by_user(
        &self,
        user_id: DbId,
        range: Option<DateRange>,
    ) -> Result<Vec<ActiveAlert>, StoreError>;

    /// Completed alerts whose `completed_at` falls inside `range`.
    async fn list_completed(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<CompletedAlert>, StoreError>;

    /// Remove an active alert without writing history.
    async fn delete_alert(&self, id: DbId) -> Result<Option<ActiveAlert>, StoreError>;

    /// Atomically remove an active alert and write its completed record.
    ///
    /// Returns `None` when the alert no longer exists, in which case nothing
    /// is written.
    async fn archive(
        &self,
        id: DbId,
        archival: &Archival,
    ) -> Result<Option<ArchivedAlert>, StoreError>;
}

/// Read access to user contact data.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_contact(&self, user_id: DbId) -> Result<Option<UserContact>, StoreError>;
}
