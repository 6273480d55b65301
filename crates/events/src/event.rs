//! Alert events and their observer wire format.
//!
//! Each event is sent to observers as one text frame:
//!
//! ```json
//! {"event": "<name>", "data": <payload>}
//! ```

use beacon_core::types::DbId;
use beacon_db::models::alert::ActiveAlert;
use serde_json::json;

pub const NEW_ALERT: &str = "newAlert";
pub const ALERT_UPDATE: &str = "alertUpdate";
pub const ALERT_DEACTIVATED: &str = "alertDeactivated";
pub const ALERT_DELETED: &str = "alertDeleted";
pub const STOP_LOCATION: &str = "stopLocation";

/// A change observers are told about.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    /// A user raised their first active alert.
    NewAlert(ActiveAlert),
    /// An existing active alert moved.
    AlertUpdate(ActiveAlert),
    /// An alert left the active set through archival (completion,
    /// user deactivation or expiry).
    AlertDeactivated { alert_id: DbId, user_id: DbId },
    /// An alert was hard-deleted without history.
    AlertDeleted(ActiveAlert),
    /// A user asked observers to stop tracking their location.
    StopLocation { user_id: DbId },
}

impl AlertEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            AlertEvent::NewAlert(_) => NEW_ALERT,
            AlertEvent::AlertUpdate(_) => ALERT_UPDATE,
            AlertEvent::AlertDeactivated { .. } => ALERT_DEACTIVATED,
            AlertEvent::AlertDeleted(_) => ALERT_DELETED,
            AlertEvent::StopLocation { .. } => STOP_LOCATION,
        }
    }

    /// JSON payload carried in the frame's `data` field.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            AlertEvent::NewAlert(alert) | AlertEvent::AlertUpdate(alert) => json!(alert),
            AlertEvent::AlertDeactivated { alert_id, user_id } => {
                json!({ "alertId": alert_id, "userId": user_id })
            }
            AlertEvent::AlertDeleted(alert) => json!({ "alerta": alert }),
            AlertEvent::StopLocation { user_id } => {
                json!({ "type": STOP_LOCATION, "userId": user_id })
            }
        }
    }

    /// The full text frame sent to observers.
    pub fn to_wire(&self) -> String {
        json!({ "event": self.name(), "data": self.payload() }).to_string()
    }
}
