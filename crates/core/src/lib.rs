//! Domain types and rules for the Beacon panic-alert backend.
//!
//! Everything here is pure: no database, no network, no clock reads. The
//! store, event and HTTP crates build on these types.

pub mod alert;
pub mod date_range;
pub mod error;
pub mod registration;
pub mod roles;
pub mod snapshot;
pub mod types;
pub mod upload;
