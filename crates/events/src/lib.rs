//! Beacon real-time event catalog and in-process broadcast channel.
//!
//! - [`AlertEvent`]: every event observers can receive, with its fixed wire
//!   name and payload shape.
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.

pub mod bus;
pub mod event;

pub use bus::EventBus;
pub use event::AlertEvent;
