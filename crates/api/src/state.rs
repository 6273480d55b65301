use std::sync::Arc;

use beacon_db::{AlertStore, PgAlertStore, PgUserDirectory, UserDirectory};
use beacon_events::EventBus;
use beacon_lifecycle::{AlertLifecycle, AlertQueries};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (users, statistics, health).
    pub pool: beacon_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (observers).
    pub ws_manager: Arc<WsManager>,
    pub event_bus: Arc<EventBus>,
    /// Alert state transitions.
    pub lifecycle: Arc<AlertLifecycle>,
    /// Alert listings.
    pub queries: Arc<AlertQueries>,
}

impl AppState {
    /// Wire the PostgreSQL-backed alert store and user directory into a
    /// lifecycle engine publishing on `event_bus`.
    pub fn new(
        pool: beacon_db::DbPool,
        config: Arc<ServerConfig>,
        ws_manager: Arc<WsManager>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let alerts: Arc<dyn AlertStore> = Arc::new(PgAlertStore::new(pool.clone()));
        let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool.clone()));
        let lifecycle = Arc::new(AlertLifecycle::new(
            Arc::clone(&alerts),
            users,
            Arc::clone(&event_bus),
        ));
        let queries = Arc::new(AlertQueries::new(alerts));

        Self {
            pool,
            config,
            ws_manager,
            event_bus,
            lifecycle,
            queries,
        }
    }
}
