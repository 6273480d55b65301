//! In-process store used by tests and local tooling.
//!
//! Every operation runs under one `tokio::sync::Mutex` guard, which gives the
//! upsert and archival transitions the same all-or-nothing behaviour the
//! PostgreSQL store gets from its unique index and transaction.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use beacon_core::date_range::DateRange;
use beacon_core::snapshot::{UserContact, UserInfoSnapshot};
use beacon_core::types::DbId;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{AlertStore, StoreError, UserDirectory};
use crate::models::alert::{
    ActiveAlert, ArchivedAlert, Archival, CompletedAlert, UpsertOutcome, UpsertedAlert,
};

#[derive(Default)]
struct State {
    next_user_id: DbId,
    next_alert_id: DbId,
    next_completed_id: DbId,
    users: HashMap<DbId, UserContact>,
    /// Keyed by alert id, so iteration order is creation order.
    alerts: BTreeMap<DbId, ActiveAlert>,
    completed: Vec<CompletedAlert>,
}

/// Alert store and user directory held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return its id.
    pub async fn add_user(&self, contact: UserContact) -> DbId {
        let mut state = self.state.lock().await;
        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(id, contact);
        id
    }

    /// Replace a user's contact fields. Unknown ids are ignored.
    pub async fn update_user(&self, user_id: DbId, contact: UserContact) {
        if let Some(existing) = self.state.lock().await.users.get_mut(&user_id) {
            *existing = contact;
        }
    }

    /// Forget a user. Their alerts stay, as they would after an external
    /// directory drops the record.
    pub async fn remove_user(&self, user_id: DbId) {
        self.state.lock().await.users.remove(&user_id);
    }

    /// Snapshot of the completed history, oldest first.
    pub async fn completed(&self) -> Vec<CompletedAlert> {
        self.state.lock().await.completed.clone()
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn upsert_active(
        &self,
        user_id: DbId,
        lat: f64,
        lng: f64,
        user_info: &UserInfoSnapshot,
    ) -> Result<UpsertedAlert, StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if let Some(existing) = state
            .alerts
            .values_mut()
            .find(|a| a.user_id == user_id && a.is_active)
        {
            existing.lat = lat;
            existing.lng = lng;
            existing.updated_at = now;
            return Ok(UpsertedAlert {
                alert: existing.clone(),
                outcome: UpsertOutcome::Updated,
            });
        }

        state.next_alert_id += 1;
        let alert = ActiveAlert {
            id: state.next_alert_id,
            user_id,
            lat,
            lng,
            is_active: true,
            user_info: user_info.clone(),
            created_at: now,
            updated_at: now,
        };
        state.alerts.insert(alert.id, alert.clone());

        Ok(UpsertedAlert {
            alert,
            outcome: UpsertOutcome::Created,
        })
    }

    async fn find_alert(&self, id: DbId) -> Result<Option<ActiveAlert>, StoreError> {
        Ok(self.state.lock().await.alerts.get(&id).cloned())
    }

    async fn find_active_by_user(
        &self,
        user_id: DbId,
    ) -> Result<Option<ActiveAlert>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .alerts
            .values()
            .find(|a| a.user_id == user_id && a.is_active)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<ActiveAlert>, StoreError> {
        let state = self.state.lock().await;
        let mut alerts: Vec<ActiveAlert> = state.alerts.values().cloned().collect();
        alerts.sort_by_key(|a| (a.created_at, a.id));
        Ok(alerts)
    }

    async fn list_by_user(
        &self,
        user_id: DbId,
        range: Option<DateRange>,
    ) -> Result<Vec<ActiveAlert>, StoreError> {
        let state = self.state.lock().await;
        let mut alerts: Vec<ActiveAlert> = state
            .alerts
            .values()
            .filter(|a| a.user_id == user_id)
            .filter(|a| range.map_or(true, |r| r.contains(a.created_at)))
            .cloned()
            .collect();
        alerts.sort_by_key(|a| (a.created_at, a.id));
        Ok(alerts)
    }

    async fn list_completed(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<CompletedAlert>, StoreError> {
        let state = self.state.lock().await;
        let mut completed: Vec<CompletedAlert> = state
            .completed
            .iter()
            .filter(|c| range.map_or(true, |r| r.contains(c.completed_at)))
            .cloned()
            .collect();
        completed.sort_by_key(|c| (c.completed_at, c.id));
        Ok(completed)
    }

    async fn delete_alert(&self, id: DbId) -> Result<Option<ActiveAlert>, StoreError> {
        Ok(self.state.lock().await.alerts.remove(&id))
    }

    async fn archive(
        &self,
        id: DbId,
        archival: &Archival,
    ) -> Result<Option<ArchivedAlert>, StoreError> {
        let mut state = self.state.lock().await;

        let Some(removed) = state.alerts.remove(&id) else {
            return Ok(None);
        };

        state.next_completed_id += 1;
        let completed = CompletedAlert {
            id: state.next_completed_id,
            alert_id: removed.id,
            user_id: removed.user_id,
            lat: removed.lat,
            lng: removed.lng,
            user_info: archival.user_info.clone(),
            comment: archival.comment.clone(),
            completed_at: archival.completed_at,
            created_at: Utc::now(),
        };
        state.completed.push(completed.clone());

        Ok(Some(ArchivedAlert { removed, completed }))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_contact(&self, user_id: DbId) -> Result<Option<UserContact>, StoreError> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }
}
