//! PostgreSQL-backed store implementations, thin adapters over the
//! repositories.

use async_trait::async_trait;
use beacon_core::date_range::DateRange;
use beacon_core::snapshot::{UserContact, UserInfoSnapshot};
use beacon_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::{AlertStore, StoreError, UserDirectory};
use crate::models::alert::{ActiveAlert, ArchivedAlert, Archival, CompletedAlert, UpsertedAlert};
use crate::repositories::{AlertRepo, CompletedAlertRepo, UserRepo};

fn bounds(range: Option<DateRange>) -> (Option<Timestamp>, Option<Timestamp>) {
    (range.map(|r| r.start), range.map(|r| r.end))
}

/// Alert store over the `alerts` and `completed_alerts` tables.
#[derive(Clone)]
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn upsert_active(
        &self,
        user_id: DbId,
        lat: f64,
        lng: f64,
        user_info: &UserInfoSnapshot,
    ) -> Result<UpsertedAlert, StoreError> {
        Ok(AlertRepo::upsert_active(&self.pool, user_id, lat, lng, user_info).await?)
    }

    async fn find_alert(&self, id: DbId) -> Result<Option<ActiveAlert>, StoreError> {
        Ok(AlertRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_active_by_user(
        &self,
        user_id: DbId,
    ) -> Result<Option<ActiveAlert>, StoreError> {
        Ok(AlertRepo::find_active_by_user(&self.pool, user_id).await?)
    }

    async fn list_active(&self) -> Result<Vec<ActiveAlert>, StoreError> {
        Ok(AlertRepo::list(&self.pool).await?)
    }

    async fn list_by_user(
        &self,
        user_id: DbId,
        range: Option<DateRange>,
    ) -> Result<Vec<ActiveAlert>, StoreError> {
        let (start, end) = bounds(range);
        Ok(AlertRepo::list_by_user(&self.pool, user_id, start, end).await?)
    }

    async fn list_completed(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<CompletedAlert>, StoreError> {
        let (start, end) = bounds(range);
        Ok(CompletedAlertRepo::list(&self.pool, start, end).await?)
    }

    async fn delete_alert(&self, id: DbId) -> Result<Option<ActiveAlert>, StoreError> {
        Ok(AlertRepo::delete(&self.pool, id).await?)
    }

    async fn archive(
        &self,
        id: DbId,
        archival: &Archival,
    ) -> Result<Option<ArchivedAlert>, StoreError> {
        Ok(AlertRepo::archive(&self.pool, id, archival).await?)
    }
}

/// User directory over the `users` table.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_contact(&self, user_id: DbId) -> Result<Option<UserContact>, StoreError> {
        let user = UserRepo::find_by_id(&self.pool, user_id).await?;
        Ok(user.as_ref().map(UserContact::from))
    }
}
