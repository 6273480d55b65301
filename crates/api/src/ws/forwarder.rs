use std::sync::Arc;

use axum::extract::ws::Message;
use beacon_events::{AlertEvent, EventBus};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::ws::manager::WsManager;

/// Subscribe to the bus and relay every event to all observers as a
/// `{"event", "data"}` text frame.
///
/// The task ends when the bus is dropped.
pub fn start_forwarder(
    bus: &EventBus,
    ws_manager: Arc<WsManager>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(forward(bus.subscribe(), ws_manager))
}

async fn forward(mut rx: broadcast::Receiver<AlertEvent>, ws_manager: Arc<WsManager>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                tracing::debug!(event = event.name(), "Relaying event to observers");
                ws_manager
                    .broadcast(Message::Text(event.to_wire().into()))
                    .await;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event forwarder lagged, events dropped");
            }
            Err(RecvError::Closed) => {
                tracing::info!("Event bus closed, forwarder stopping");
                break;
            }
        }
    }
}
