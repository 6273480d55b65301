#![allow(dead_code)]

use std::sync::Arc;

use beacon_core::snapshot::UserContact;
use beacon_core::types::DbId;
use beacon_db::{AlertStore, MemoryStore, UserDirectory};
use beacon_events::{AlertEvent, EventBus};
use beacon_lifecycle::{AlertLifecycle, AlertQueries};
use tokio::sync::broadcast;

/// Engine, queries and bus wired to one in-process store.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub bus: Arc<EventBus>,
    pub lifecycle: Arc<AlertLifecycle>,
    pub queries: AlertQueries,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_alert_store(Arc::new(MemoryStore::new()), None)
    }

    /// Build a harness whose alert operations go through `alerts` instead of
    /// the memory store directly. Users still live in the memory store.
    pub fn with_alert_store(
        store: Arc<MemoryStore>,
        alerts: Option<Arc<dyn AlertStore>>,
    ) -> Self {
        let bus = Arc::new(EventBus::default());
        let alerts: Arc<dyn AlertStore> =
            alerts.unwrap_or_else(|| store.clone() as Arc<dyn AlertStore>);
        let users: Arc<dyn UserDirectory> = store.clone();
        let lifecycle = Arc::new(AlertLifecycle::new(alerts.clone(), users, bus.clone()));
        let queries = AlertQueries::new(alerts);
        Self {
            store,
            bus,
            lifecycle,
            queries,
        }
    }

    pub async fn user(&self, name: &str) -> DbId {
        self.store
            .add_user(UserContact {
                name: Some(name.to_string()),
                surname: Some("Tester".into()),
                email: Some(format!("{}@example.com", name.to_lowercase())),
                phone: Some("555-0100".into()),
                address: Some("Calle 1".into()),
                photo: None,
            })
            .await
    }
}

/// Everything currently buffered on a receiver, in order.
pub fn drain(rx: &mut broadcast::Receiver<AlertEvent>) -> Vec<AlertEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
