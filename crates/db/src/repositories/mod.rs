//! Repository types, one per table group. Each is a unit struct whose
//! associated functions take a pool (or connection) explicitly.

mod alert_repo;
mod completed_alert_repo;
mod statistic_repo;
mod user_repo;

pub use alert_repo::AlertRepo;
pub use completed_alert_repo::CompletedAlertRepo;
pub use statistic_repo::StatisticRepo;
pub use user_repo::UserRepo;
