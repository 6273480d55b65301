//! Active and completed alert models.

use beacon_core::snapshot::UserInfoSnapshot;
use beacon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `alerts` table: an open panic alert.
///
/// Serialized in camelCase because observers consume it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAlert {
    pub id: DbId,
    pub user_id: DbId,
    pub lat: f64,
    pub lng: f64,
    pub is_active: bool,
    #[sqlx(json)]
    pub user_info: UserInfoSnapshot,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `completed_alerts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompletedAlert {
    pub id: DbId,
    /// Id the alert had while it was active.
    pub alert_id: DbId,
    pub user_id: DbId,
    pub lat: f64,
    pub lng: f64,
    #[sqlx(json)]
    pub user_info: UserInfoSnapshot,
    pub comment: String,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
}

/// Whether an upsert inserted a new alert or moved an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Result of the atomic find-or-insert on `{user_id, is_active}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertedAlert {
    pub alert: ActiveAlert,
    pub outcome: UpsertOutcome,
}

/// Values written to the history row during archival.
#[derive(Debug, Clone)]
pub struct Archival {
    /// Snapshot resolved at archival time, not the one stored on the alert.
    pub user_info: UserInfoSnapshot,
    pub comment: String,
    pub completed_at: Timestamp,
}

/// Both halves of a successful archival transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedAlert {
    /// The active row as it was just before deletion.
    pub removed: ActiveAlert,
    pub completed: CompletedAlert,
}
