//! The alert lifecycle engine.
//!
//! Every state change goes through the store's atomic operations first and
//! publishes its event only after the store call succeeded, so observers
//! never hear about a change that did not happen.

use std::sync::Arc;

use beacon_core::alert::{resolve_comment, validate_coordinates, DEFAULT_COMMENT};
use beacon_core::error::CoreError;
use beacon_core::snapshot::UserInfoSnapshot;
use beacon_core::types::{DbId, Timestamp};
use beacon_db::models::alert::{ActiveAlert, Archival, CompletedAlert, UpsertOutcome};
use beacon_db::{AlertStore, UserDirectory};
use beacon_events::{AlertEvent, EventBus};
use chrono::Utc;

use crate::error::LifecycleError;

/// Result of [`AlertLifecycle::raise_alert`].
#[derive(Debug, Clone, PartialEq)]
pub struct RaisedAlert {
    pub alert: ActiveAlert,
    /// `true` when a new alert was inserted, `false` when an existing one moved.
    pub created: bool,
}

/// What happened to one alert handed to [`AlertLifecycle::expire`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExpireOutcome {
    Archived(CompletedAlert),
    /// Another path archived or deleted the alert first.
    AlreadyGone,
}

pub struct AlertLifecycle {
    alerts: Arc<dyn AlertStore>,
    users: Arc<dyn UserDirectory>,
    bus: Arc<EventBus>,
}

impl AlertLifecycle {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        users: Arc<dyn UserDirectory>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self { alerts, users, bus }
    }

    /// Create the user's active alert, or move the one they already have.
    ///
    /// Publishes `newAlert` for a created alert and `alertUpdate` for a moved
    /// one.
    pub async fn raise_alert(
        &self,
        user_id: DbId,
        lat: f64,
        lng: f64,
    ) -> Result<RaisedAlert, LifecycleError> {
        validate_coordinates(lat, lng)?;

        let snapshot = self
            .snapshot_for(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let upserted = self
            .alerts
            .upsert_active(user_id, lat, lng, &snapshot)
            .await?;

        let created = upserted.outcome == UpsertOutcome::Created;
        if created {
            tracing::info!(alert_id = upserted.alert.id, user_id, "Alert raised");
            self.bus.publish(AlertEvent::NewAlert(upserted.alert.clone()));
        } else {
            tracing::info!(alert_id = upserted.alert.id, user_id, "Alert location updated");
            self.bus
                .publish(AlertEvent::AlertUpdate(upserted.alert.clone()));
        }

        Ok(RaisedAlert {
            alert: upserted.alert,
            created,
        })
    }

    /// Archive an alert with an optional comment.
    ///
    /// Returns `Ok(None)` when the alert vanished between lookup and archival;
    /// in that case nothing is written and no event is published.
    pub async fn complete_alert(
        &self,
        alert_id: DbId,
        comment: Option<&str>,
    ) -> Result<Option<CompletedAlert>, LifecycleError> {
        let comment = resolve_comment(comment)?;

        let alert = self
            .alerts
            .find_alert(alert_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "alert",
                id: alert_id,
            })?;

        self.archive_owned(&alert, comment, Utc::now()).await
    }

    /// Archive the user's active alert with the default comment.
    pub async fn deactivate_by_user(
        &self,
        user_id: DbId,
    ) -> Result<Option<CompletedAlert>, LifecycleError> {
        let alert = self
            .alerts
            .find_active_by_user(user_id)
            .await?
            .ok_or_else(|| {
                CoreError::NothingFound(format!("No active alert for user {user_id}"))
            })?;

        self.archive_owned(&alert, DEFAULT_COMMENT.to_string(), Utc::now())
            .await
    }

    /// Remove an alert without writing history. Publishes `alertDeleted`.
    pub async fn delete_alert(&self, alert_id: DbId) -> Result<ActiveAlert, LifecycleError> {
        let removed = self
            .alerts
            .delete_alert(alert_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "alert",
                id: alert_id,
            })?;

        tracing::info!(alert_id, user_id = removed.user_id, "Alert deleted");
        self.bus.publish(AlertEvent::AlertDeleted(removed.clone()));
        Ok(removed)
    }

    /// Tell observers to stop tracking a user. Touches no state.
    pub fn stop_location(&self, user_id: DbId) {
        tracing::info!(user_id, "Stop location requested");
        self.bus.publish(AlertEvent::StopLocation { user_id });
    }

    /// Archive an alert on behalf of the expiry sweeper.
    ///
    /// Unlike [`complete_alert`](Self::complete_alert), a missing owner is
    /// not an error: the alert is archived with the snapshot taken when it
    /// was raised.
    pub async fn expire(
        &self,
        alert: &ActiveAlert,
        now: Timestamp,
    ) -> Result<ExpireOutcome, LifecycleError> {
        let snapshot = match self.snapshot_for(alert.user_id).await? {
            Some(snapshot) => snapshot,
            None => {
                tracing::warn!(
                    alert_id = alert.id,
                    user_id = alert.user_id,
                    "Owner missing, archiving with stored snapshot"
                );
                alert.user_info.clone()
            }
        };

        let outcome = match self
            .archive(alert, snapshot, DEFAULT_COMMENT.to_string(), now)
            .await?
        {
            Some(completed) => ExpireOutcome::Archived(completed),
            None => ExpireOutcome::AlreadyGone,
        };
        Ok(outcome)
    }

    /// Every active alert, oldest first.
    pub async fn active_alerts(&self) -> Result<Vec<ActiveAlert>, LifecycleError> {
        Ok(self.alerts.list_active().await?)
    }

    async fn archive_owned(
        &self,
        alert: &ActiveAlert,
        comment: String,
        completed_at: Timestamp,
    ) -> Result<Option<CompletedAlert>, LifecycleError> {
        let snapshot = self
            .snapshot_for(alert.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: alert.user_id,
            })?;

        self.archive(alert, snapshot, comment, completed_at).await
    }

    /// The single archival transition shared by completion, deactivation and
    /// expiry.
    async fn archive(
        &self,
        alert: &ActiveAlert,
        user_info: UserInfoSnapshot,
        comment: String,
        completed_at: Timestamp,
    ) -> Result<Option<CompletedAlert>, LifecycleError> {
        let archival = Archival {
            user_info,
            comment,
            completed_at,
        };

        let Some(archived) = self.alerts.archive(alert.id, &archival).await? else {
            tracing::debug!(alert_id = alert.id, "Alert already archived, skipping");
            return Ok(None);
        };

        tracing::info!(
            alert_id = archived.removed.id,
            user_id = archived.removed.user_id,
            "Alert archived"
        );
        self.bus.publish(AlertEvent::AlertDeactivated {
            alert_id: archived.removed.id,
            user_id: archived.removed.user_id,
        });

        Ok(Some(archived.completed))
    }

    /// Fresh contact snapshot for a user, or `None` if the directory has no
    /// such user.
    async fn snapshot_for(
        &self,
        user_id: DbId,
    ) -> Result<Option<UserInfoSnapshot>, LifecycleError> {
        let contact = self.users.find_contact(user_id).await?;
        Ok(contact.as_ref().map(UserInfoSnapshot::capture))
    }
}
