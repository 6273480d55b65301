//! WebSocket infrastructure for alert observers.
//!
//! Connection management, heartbeat pings, the HTTP upgrade handler, and the
//! forwarder that relays bus events to every connection.

mod forwarder;
mod handler;
mod heartbeat;
pub mod manager;

pub use forwarder::start_forwarder;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
