//! Alert lifecycle for Beacon.
//!
//! - [`AlertLifecycle`]: raise, complete, deactivate, delete and
//!   stop-location operations, each publishing its event on the bus.
//! - [`ExpirySweeper`]: background task archiving alerts that outlive their
//!   maximum age.
//! - [`AlertQueries`]: read-only listings with calendar range filters.

pub mod engine;
pub mod error;
pub mod queries;
pub mod sweeper;

pub use engine::{AlertLifecycle, ExpireOutcome, RaisedAlert};
pub use error::LifecycleError;
pub use queries::AlertQueries;
pub use sweeper::{ExpirySweeper, SweepReport, SweeperConfig};
